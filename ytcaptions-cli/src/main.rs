use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ytcaptions::select::{score, select_best_track};
use ytcaptions::{
    ExtractOptions, ExtractResponse, Extractor, HtmlPanelReader, PageContext, Request, TidyPrompt,
};

#[derive(Parser)]
#[command(name = "ytcaptions", about = "Extract the caption transcript of a YouTube video")]
struct Cli {
    /// Watch or shorts URL.
    url: String,

    /// Preferred caption language, most preferred first (repeatable).
    #[arg(short, long = "lang", default_values_t = vec!["ja".to_string(), "en".to_string()])]
    langs: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "12")]
    timeout: f64,

    /// HTML snapshot of the watch page with the transcript panel open, used
    /// when no caption track can be fetched (default: the downloaded page).
    #[arg(long)]
    panel_html: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Write output to file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List the advertised caption tracks with their scores and exit.
    #[arg(long)]
    list_tracks: bool,

    /// Print a prompt asking a chat assistant to tidy the transcript.
    #[arg(long)]
    tidy: bool,

    /// Prompt template file for --tidy; `{{text}}` marks where the transcript goes.
    #[arg(long, requires = "tidy")]
    template: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn timeout_from_secs(secs: f64) -> Result<Duration, String> {
    if !(secs.is_finite() && secs > 0.0) {
        return Err("--timeout must be a positive number of seconds".into());
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("--timeout {secs}: {e}"))
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ytcaptions=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let timeout = match timeout_from_secs(cli.timeout) {
        Ok(t) => t,
        Err(e) => fail(e),
    };

    let opts = match ExtractOptions::new()
        .preferred_langs(&cli.langs)
        .and_then(|o| o.timeout(timeout))
    {
        Ok(o) => o,
        Err(e) => fail(e),
    };

    let template = cli.template.as_ref().map(|path| match std::fs::read_to_string(path) {
        Ok(t) => TidyPrompt::new(t),
        Err(e) => fail(format!("reading {}: {e}", path.display())),
    });

    let panel_html = cli.panel_html.as_ref().map(|path| match std::fs::read_to_string(path) {
        Ok(html) => html,
        Err(e) => fail(format!("reading {}: {e}", path.display())),
    });

    if ytcaptions::page::video_id_from_url(&cli.url).is_none() {
        let resp = ExtractResponse::failure(&ytcaptions::Error::NotOnWatchPage);
        finish(&cli, &resp, template.as_ref());
    }

    let page = match PageContext::load(&cli.url, opts.timeout).await {
        Ok(page) => page,
        Err(e) => {
            eprintln!("Warning: could not load watch page: {e}");
            PageContext::new(cli.url.clone(), String::new())
        }
    };

    let panel = HtmlPanelReader::new(panel_html.unwrap_or_else(|| page.html().to_string()));
    let extractor = Extractor::new(opts, Box::new(panel));

    if cli.list_tracks {
        list_tracks(&extractor, &page).await;
        return;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .expect("valid template"),
    );
    spinner.set_message("Extracting captions");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let resp = extractor.handle(&Request::Extract, &page).await;
    spinner.finish_and_clear();

    finish(&cli, &resp, template.as_ref());
}

async fn list_tracks(extractor: &Extractor, page: &PageContext) {
    let tracks = match extractor.list_tracks(page).await {
        Ok(t) => t,
        Err(e) => fail(e),
    };
    if tracks.is_empty() {
        println!("No caption tracks advertised");
        return;
    }

    let opts = extractor.options();

    let best = select_best_track(&tracks, &opts.preferred_langs);
    println!("{:<3} {:<10} {:<6} {:<6} {}", "", "LANG", "ORIGIN", "SCORE", "NAME");
    println!("{:<3} {:<10} {:<6} {:<6} {}", "", "----", "------", "-----", "----");
    for track in &tracks {
        let marker = if best.is_some_and(|b| std::ptr::eq(b, track)) { "*" } else { "" };
        let origin = if track.is_auto_generated() { "auto" } else { "human" };
        println!(
            "{marker:<3} {:<10} {origin:<6} {:<6} {}",
            track.language(),
            score(track, &opts.preferred_langs),
            track.display_name()
        );
    }
}

fn finish(cli: &Cli, resp: &ExtractResponse, template: Option<&TidyPrompt>) -> ! {
    if let Some(source) = &resp.source {
        eprintln!("Extraction complete via {source}");
    }

    let output_text = match (&cli.format, resp.ok && cli.tidy) {
        (OutputFormat::Json, _) => match resp.to_json_pretty() {
            Ok(j) => j + "\n",
            Err(e) => fail(format!("JSON error: {e}")),
        },
        (OutputFormat::Text, true) => {
            let prompt = template.cloned().unwrap_or_default();
            match prompt.render(resp.text.as_deref().unwrap_or_default()) {
                Ok(p) => {
                    eprintln!("Paste into {}", ytcaptions::prompt::CHAT_URL);
                    p + "\n"
                }
                Err(e) => fail(e),
            }
        }
        (OutputFormat::Text, false) => match (&resp.text, &resp.error) {
            (Some(text), _) => format!("{text}\n"),
            (None, Some(err)) => fail(err),
            (None, None) => fail("unknown error"),
        },
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &output_text) {
                fail(format!("writing to {}: {e}", path.display()));
            }
            eprintln!("Written to {}", path.display());
        }
        None => print!("{output_text}"),
    }

    std::process::exit(if resp.ok { 0 } else { 1 });
}
