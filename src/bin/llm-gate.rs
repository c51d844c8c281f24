//! llm-gate binary
//!
//! Serves the provider dispatch gateway over HTTP

use anyhow::Result;
use clap::Parser;
use llm_gate::gate::{start_server, GatewayConfig};
use llm_gate::{CredentialResolver, ProviderId};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

/// llm-gate: provider dispatch gateway
#[derive(Parser, Debug)]
#[command(name = "llm-gate")]
#[command(about = "Forward generation requests to OpenAI, Anthropic, Gemini or a local backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Timeout for hosted backends in seconds
    #[arg(long)]
    hosted_timeout: Option<u64>,

    /// Timeout for the local backend in seconds
    #[arg(long)]
    local_timeout: Option<u64>,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// Report which provider credentials are configured and exit
    #[arg(long)]
    check_credentials: bool,
}

/// Find a config file in the default locations
fn default_config_file() -> Option<PathBuf> {
    let local = Path::new("./llm-gate.toml");
    if local.exists() {
        return Some(local.to_path_buf());
    }
    let home_config = dirs::home_dir()?.join(".llm-gate").join("config.toml");
    home_config.exists().then_some(home_config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config_file = args.config.clone().or_else(default_config_file);

    // Load configuration
    let mut config = match config_file {
        Some(ref path) => {
            tracing::info!("Loading config from: {}", path.display());
            GatewayConfig::load(path)?
        }
        None => {
            tracing::info!("Using default configuration");
            GatewayConfig::default()
        }
    };

    // Override with CLI arguments
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(secs) = args.hosted_timeout {
        config.hosted_timeout_secs = secs;
    }
    if let Some(secs) = args.local_timeout {
        config.local_timeout_secs = secs;
    }

    config.validate()?;

    let credentials = CredentialResolver::from_env();

    if args.validate {
        print_config(&config);
        return Ok(());
    }

    if args.check_credentials {
        check_credentials(&credentials);
        return Ok(());
    }

    start_server(config, credentials).await
}

fn print_config(config: &GatewayConfig) {
    println!("Configuration validation:");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    println!("  Hosted timeout: {}s", config.hosted_timeout_secs);
    println!("  Local timeout: {}s", config.local_timeout_secs);
    println!("  Anthropic max_tokens: {}", config.anthropic_max_tokens);
    println!("\n✓ Configuration is valid");
}

/// Never prints secret values, only whether they are present
fn check_credentials(credentials: &CredentialResolver) {
    println!("Provider credentials:");
    for provider in ProviderId::ALL {
        let names = CredentialResolver::api_key_names(provider);
        let status = if names.is_empty() {
            "not required".to_string()
        } else if credentials.api_key(provider).is_some() {
            "configured".to_string()
        } else {
            format!("missing (set {})", names.join(" or "))
        };
        println!(
            "  {:<10} {:<40} {}",
            provider.as_str(),
            credentials
                .public_base_url(provider)
                .unwrap_or_else(|| "(invalid base URL)".to_string()),
            status
        );
    }
}
