use std::io::Write;

use chatstream::{ChatStreamClient, StreamConfig, StreamStatus};
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("chatstream {}", VERSION);
    eprintln!();
    eprintln!("Usage: chatstream <prompt...>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CHATSTREAM_ENDPOINT              streaming endpoint URL");
    eprintln!("  CHATSTREAM_API_KEY               bearer token");
    eprintln!("  CHATSTREAM_MODEL                 model name added to the request");
    eprintln!("  CHATSTREAM_CONNECT_TIMEOUT_SECS  connect timeout (default 10)");
    eprintln!("  CHATSTREAM_IDLE_TIMEOUT_SECS     max gap between chunks, 0 disables (default 60)");
    eprintln!("  RUST_LOG                         log filter (default warn)");
}

fn build_request(prompt: &str) -> serde_json::Value {
    let mut body = serde_json::json!({
        "messages": [{ "role": "user", "content": prompt }],
        "stream": true,
    });
    if let Ok(model) = std::env::var("CHATSTREAM_MODEL") {
        body["model"] = serde_json::Value::String(model);
    }
    body
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so stdout only carries the streamed text
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }
    if args.iter().any(|a| a == "-V" || a == "--version") {
        println!("chatstream {}", VERSION);
        return Ok(());
    }
    let prompt = args.join(" ");

    let config = StreamConfig::from_env();
    let client = ChatStreamClient::new(config)
        .map_err(|e| eyre!("failed to build HTTP client: {}", e))?;
    let handle = client.stream(&build_request(&prompt));
    let mut rx = handle.subscribe();

    let mut printed = 0;
    let mut stdout = std::io::stdout();
    loop {
        let snapshot = rx.borrow_and_update().clone();
        if snapshot.text.len() > printed {
            stdout.write_all(snapshot.text[printed..].as_bytes())?;
            stdout.flush()?;
            printed = snapshot.text.len();
        }
        if snapshot.status.is_terminal() {
            break;
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
                break;
            }
        }
    }

    let snapshot = handle.wait().await;
    if snapshot.text.len() > printed {
        stdout.write_all(snapshot.text[printed..].as_bytes())?;
    }
    writeln!(stdout)?;

    match (snapshot.status, snapshot.error) {
        (StreamStatus::Errored, Some(error)) if error.kind().is_user_visible_failure() => {
            bail!("{} [{}]", error.user_message(), error.error_code())
        }
        _ => Ok(()),
    }
}
