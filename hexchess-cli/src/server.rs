//! `hexchess serve` - check the directories, then run the game server
//!
//! The data directory is created on demand. A missing frontend build is
//! only a warning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexchess_server::{run_server, ServerConfig};

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Directory containing the built frontend
    #[arg(long, default_value = "frontend/dist")]
    pub static_dir: PathBuf,

    /// Directory where game records are kept
    #[arg(long, default_value = "games")]
    pub data_dir: PathBuf,

    /// Create a game with this id at startup
    #[arg(long, value_name = "ID")]
    pub seed_game: Option<String>,
}

// ============================================================================
// COMMAND
// ============================================================================

/// Blocks until the server shuts down
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting HEXCHESS server on port {}", config.port);

    start_server(config)
}

fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;
    prepare_data_dir(&args.data_dir)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        data_dir: args.data_dir.clone(),
        seeded_game: args.seed_game.clone(),
    })
}

fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// DIRECTORIES
// ============================================================================

fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

/// Game records land here, one JSON file per game
fn prepare_data_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        anyhow::bail!("Data path exists but is not a directory: {}", path.display());
    }

    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create data directory {}", path.display()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hexchess-cli-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_configure_server() {
        let data_dir = temp_path("data");
        let args = ServerArgs {
            port: 3000,
            static_dir: PathBuf::from("test_static"),
            data_dir: data_dir.clone(),
            seed_game: Some("seed".to_string()),
        };

        let config = configure_server(&args).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_dir, "test_static");
        assert_eq!(config.seeded_game.as_deref(), Some("seed"));
        assert!(data_dir.is_dir());

        let _ = std::fs::remove_dir_all(&data_dir);
    }

    #[test]
    fn test_validate_static_dir_nonexistent() {
        // Should not error, just warn
        let result = validate_static_dir(Path::new("/nonexistent/path"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_static_path_must_be_directory() {
        let file = temp_path("static-file");
        std::fs::write(&file, "x").unwrap();

        assert!(validate_static_dir(&file).is_err());

        let _ = std::fs::remove_file(&file);
    }

    #[test]
    fn test_data_dir_must_be_directory() {
        let file = temp_path("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        assert!(prepare_data_dir(&file).is_err());

        let _ = std::fs::remove_file(&file);
    }
}
