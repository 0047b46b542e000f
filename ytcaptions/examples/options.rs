//! Extract with custom language preferences and a saved transcript-panel snapshot,
//! then print the tidy prompt.
//!
//! Usage: cargo run --example options -- "https://www.youtube.com/watch?v=..." [panel.html]

use std::time::Duration;

use ytcaptions::{ExtractOptions, Extractor, HtmlPanelReader, PageContext, Request, TidyPrompt};

#[tokio::main]
async fn main() -> ytcaptions::Result<()> {
    let mut args = std::env::args().skip(1);
    let url = args.next().expect("usage: options <watch-url> [panel.html]");

    let opts = ExtractOptions::new()
        .preferred_langs(["en", "en-GB"])?
        .timeout(Duration::from_secs(5))?;

    let page = PageContext::load(&url, opts.timeout).await?;
    let panel_html = match args.next() {
        Some(path) => std::fs::read_to_string(path)?,
        None => page.html().to_string(),
    };

    let extractor = Extractor::new(opts, Box::new(HtmlPanelReader::new(panel_html)));

    for track in extractor.list_tracks(&page).await.unwrap_or_default() {
        println!("track: {} ({})", track.language(), track.display_name());
    }

    let response = extractor.handle(&Request::Extract, &page).await;
    if response.ok {
        let text = response.text.as_deref().unwrap_or_default();
        println!("{}", TidyPrompt::default().render(text)?);
    } else {
        eprintln!("{}", response.to_json_pretty()?);
    }

    Ok(())
}
