use crate::error::{Error, Result};

/// Chat page the tidy prompt is meant for; temporary chats are not kept in history.
pub const CHAT_URL: &str = "https://chatgpt.com/?temporary-chat=true";

/// Placeholder replaced by the transcript.
pub const TEXT_PLACEHOLDER: &str = "{{text}}";

/// Default instructions for turning raw captions into readable prose. Written
/// for Japanese transcripts, the first preferred language by default.
pub const DEFAULT_TEMPLATE: &str = "\
以下に示すテキストは、YouTube動画の字幕を抽出したものです。
句読点や改行が未整形で読みづらい状態のため、次のルールに準じた整形を行ってください。

▼整形ルール

1. 文の切れ目に「。」「、」などの句読点を補ってください。
2. 話のまとまりごとに、3〜4文程度の段落に分けてください。
3. 元の話し方の雰囲気はできるだけ残してください。
4. 明らかな誤変換や誤字があれば、文脈から自然な表現に修正してください。
5. 内容に変更は加えず、あくまで「読みやすく整形」することを優先してください。要約は極力行わないでください。

▼出力フォーマット

・整形済みの本文だけを出力してください。
・箇条書きや解説は不要です。

▼整形対象テキスト

{{text}}";

/// A prompt template with a `{{text}}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyPrompt {
    template: String,
}

impl Default for TidyPrompt {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl TidyPrompt {
    /// Use a custom template. A blank template falls back to the default.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        if template.trim().is_empty() {
            Self::default()
        } else {
            Self { template }
        }
    }

    /// Fill the template with `transcript`.
    ///
    /// Every placeholder is replaced; a template without one gets the
    /// transcript appended after a blank line.
    pub fn render(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(Error::InvalidOption("no transcript to tidy".into()));
        }
        if self.template.contains(TEXT_PLACEHOLDER) {
            Ok(self.template.replace(TEXT_PLACEHOLDER, transcript))
        } else {
            Ok(format!("{}\n\n{transcript}", self.template.trim_end()))
        }
    }
}
