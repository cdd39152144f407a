//! brief-chat entry point
//!
//! Resolution order for settings: CLI args > env vars > ~/.brief/config.toml
//! > defaults. The health probe at startup only decides the banner; chat
//! works (and reports errors per request) either way.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use brief_chat::classify::DepthChoice;
use brief_chat::client::BriefClient;
use brief_chat::config::Config;
use brief_chat::repl::{colors, Repl};

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "brief-chat")]
#[command(about = "Terminal chat client for a research-brief backend")]
struct Args {
    /// Backend base URL
    #[arg(long, env = "API_URL")]
    api_url: Option<String>,

    /// Research depth (auto/quick/medium/deep)
    #[arg(long)]
    depth: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (from ~/.brief/.env or current dir)
    let env_path = dirs::home_dir()
        .map(|h| h.join(".brief").join(".env"))
        .filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv();
    }

    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::load();

    let api_url = args
        .api_url
        .or(config.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let depth_choice = resolve_depth(args.depth.or(config.depth).as_deref());

    let client = BriefClient::new(api_url);
    let connected = client.health().await;

    let mut repl = Repl::new(client, depth_choice, connected)?;

    // Startup banner
    println!();
    println!(
        "  {} {}",
        colors::banner_accent("Research Assistant"),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", colors::separator(50));
    println!("{}", colors::banner_line("Backend", repl.backend_url()));
    if connected {
        println!(
            "{}",
            colors::banner_line("Status", &colors::success("connected"))
        );
    } else {
        println!(
            "{}",
            colors::banner_line("Status", &colors::warning("unreachable"))
        );
        println!(
            "{}",
            colors::status("  Set a backend with /backend <url> or the API_URL env var")
        );
    }
    println!(
        "{}",
        colors::banner_line("Depth", depth_choice.as_str())
    );
    println!("{}", colors::banner_line("Session", repl.user_id()));
    println!("{}", colors::separator(50));
    println!();

    repl.run().await
}

/// Resolve the requested depth, warning (not failing) on an unknown value
fn resolve_depth(requested: Option<&str>) -> DepthChoice {
    match requested {
        None => DepthChoice::default(),
        Some(value) => match DepthChoice::parse(value) {
            Some(choice) => choice,
            None => {
                eprintln!(
                    "Warning: Unknown depth \"{}\", using auto (expected auto, quick, medium, or deep)",
                    value
                );
                DepthChoice::default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_chat::classify::ResearchDepth;

    #[test]
    fn test_resolve_depth_valid() {
        assert_eq!(resolve_depth(Some("deep")), DepthChoice::Fixed(ResearchDepth::Deep));
        assert_eq!(resolve_depth(Some("Auto")), DepthChoice::Auto);
    }

    #[test]
    fn test_resolve_depth_unset_is_auto() {
        assert_eq!(resolve_depth(None), DepthChoice::Auto);
    }

    #[test]
    fn test_resolve_depth_invalid_falls_back_to_auto() {
        assert_eq!(resolve_depth(Some("bogus")), DepthChoice::Auto);
    }
}
