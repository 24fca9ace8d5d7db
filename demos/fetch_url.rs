//! Fetches a URL and prints the status line, headers and body.
//!
//! ```text
//! RUST_LOG=debug cargo run --example fetch_url -- http://example.com/ [referrer]
//! ```

use anyhow::Context;
use gosub_fetch::{fetch, FetchOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let url = args.next().context("usage: fetch_url <url> [referrer]")?;

    let mut options = FetchOptions::new().header("accept", "*/*");
    if let Some(referrer) = args.next() {
        options = options.referrer(referrer);
    }

    let mut resp = fetch(&url, options).await.with_context(|| format!("fetching {url}"))?;

    println!("{} {}", resp.status(), resp.status_text());
    let mut headers: Vec<_> = resp.headers().iter().collect();
    headers.sort();
    for (name, value) in headers {
        println!("{name}: {value}");
    }
    println!();

    let body = resp.text().await.context("reading body")?;
    println!("{body}");

    if !resp.ok() {
        anyhow::bail!("server answered {}", resp.status());
    }

    Ok(())
}
