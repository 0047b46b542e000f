//! Extract the transcript of a video and print it.
//!
//! Usage: cargo run --example basic -- "https://www.youtube.com/watch?v=..."

#[tokio::main]
async fn main() {
    let url = std::env::args()
        .nth(1)
        .expect("usage: basic <watch-url>");

    let response = ytcaptions::extract_url(&url).await;

    match (response.ok, response.text, response.error) {
        (true, Some(text), _) => {
            eprintln!("source: {}", response.source.unwrap_or_default());
            println!("{text}");
        }
        (_, _, error) => eprintln!("failed: {}", error.unwrap_or_default()),
    }
}
