use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codelens_api::{bootstrap_subscriber, init_tracing, AppState, Server};
use codelens_core::{CodeLensConfig, ConfigManager};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codelens-api",
    version,
    author,
    about = "CodeLens code analysis and explanation server",
    long_about = "HTTP service that rewrites code for a chosen focus and explains it \
                  as a summary, complexity analysis, mermaid flowchart and recommendations."
)]
struct Cli {
    /// Configuration file (defaults to ./.codelens.toml or ~/.codelens/config.toml)
    #[arg(short, long, env = "CODELENS_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file and exit
    InitConfig {
        #[arg(default_value = ".codelens.toml")]
        path: PathBuf,
    },
}

impl Cli {
    /// Flags win over the config file and environment
    fn apply_overrides(&self, config: &mut CodeLensConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::InitConfig { path }) = &cli.command {
        ConfigManager::create_default_config(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // The configured format is unknown until the config is read
    let mut manager = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        match &cli.config {
            Some(path) => ConfigManager::load_from_path(path),
            None => ConfigManager::load(),
        }
    })
    .context("Failed to load configuration")?;

    cli.apply_overrides(manager.config_mut());

    let config = manager.config();
    init_tracing(&config.logging);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let state = AppState::from_config(config).context("Failed to initialize LLM provider")?;

    Server::new(addr, state).run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["codelens-api", "--host", "0.0.0.0", "--port", "8080"]);
        let mut config = CodeLensConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = Cli::parse_from(["codelens-api"]);
        let mut config = CodeLensConfig::default();
        config.server.host = "10.0.0.5".to_string();
        config.server.port = 4000;
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.host, "10.0.0.5");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_init_config_subcommand() {
        let cli = Cli::parse_from(["codelens-api", "init-config", "/tmp/codelens.toml"]);
        match cli.command {
            Some(Commands::InitConfig { path }) => {
                assert_eq!(path, PathBuf::from("/tmp/codelens.toml"))
            }
            None => panic!("expected init-config"),
        }
    }
}
