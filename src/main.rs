//! respkv server entry point.
//!
//! Parses the command line, sets up logging, binds the listener and serves
//! until Ctrl+C.

use anyhow::Context;
use clap::Parser;
use respkv::Server;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "respkv", author, version, about = "In-memory Redis-compatible key-value server", long_about = None)]
struct Config {
    /// Host to bind to
    #[arg(long, default_value = respkv::DEFAULT_HOST)]
    host: String,

    /// Port to listen on. Use 0 for an ephemeral port.
    #[arg(short, long, default_value_t = respkv::DEFAULT_PORT)]
    port: u16,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "respkv=trace")
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Config {
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level {:?}", config.log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn print_banner(addr: &std::net::SocketAddr) {
    println!(
        r#"
respkv v{}
──────────────────────────────────────
Listening on {}
Use Ctrl+C to shut down.
"#,
        respkv::VERSION,
        addr
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config)?;

    let server = Server::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    let addr = server.local_addr().context("failed to read local address")?;

    print_banner(&addr);
    info!(address = %addr, "Server started");

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    server
        .run_until(shutdown)
        .await
        .context("server stopped unexpectedly")?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["respkv"]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6379);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bind_address(), "127.0.0.1:6379");
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "respkv",
            "--host",
            "0.0.0.0",
            "-p",
            "6380",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:6380");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Config::try_parse_from(["respkv", "--port", "not-a-port"]).is_err());
        assert!(Config::try_parse_from(["respkv", "--port", "70000"]).is_err());
    }
}
