//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `dispatch <request>` -- run one WhatsApp action against the dry-run sender
//! - `config show|path` -- inspect the loaded configuration
//! - `tool-schema` -- print the agent tool definition
//! - `version` -- print build/version info

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::agent::{handle_whatsapp_action, whatsapp_tool_definition};
use crate::channels::{DryRunSender, DynWhatsAppSender};
use crate::config::{self, Config, ConfigSource, CONFIG_PATH_ENV};
use crate::logging::{self, LogFormat};

/// Preview WhatsApp agent actions against a gateway config.
#[derive(Parser, Debug)]
#[command(
    name = "wa-action",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate and dry-run WhatsApp reaction and poll actions"
)]
pub struct Cli {
    /// Config file (JSON5). Defaults to $WA_ACTIONS_CONFIG_PATH or the platform config dir.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, overriding the config file (RUST_LOG wins over both).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format, overriding the config file.
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dispatch one action, e.g. '{"action":"react","chatJid":"..","messageId":"..","emoji":"👍"}'.
    Dispatch {
        /// Action parameters as JSON, or "-" to read them from stdin.
        request: String,
    },

    /// Inspect configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print the `whatsapp` tool definition as JSON.
    ToolSchema,

    /// Print version and git commit information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the loaded configuration as JSON.
    Show,

    /// Print the resolved configuration file path.
    Path,
}

/// Resolve the config path, then load config, set up logging and run the
/// selected subcommand. `config path` never reads the file.
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let env_override = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let source = config::resolve_config_source(cli.config.as_deref(), env_override);

    if let Command::Config(ConfigCommand::Path) = cli.command {
        handle_config_path(source.as_ref());
        return Ok(());
    }

    let cfg = config::load_config_from_source(source.as_ref())?;

    let level = cli.log_level.as_deref().unwrap_or(cfg.log_level());
    let format = cli.log_format.unwrap_or(cfg.log_format());
    logging::init_logging(level, format)?;
    log_config_source(source.as_ref());

    match cli.command {
        Command::Dispatch { request } => handle_dispatch(&request, &cfg, &dry_run_sender()).await,
        Command::Config(ConfigCommand::Show) => handle_config_show(&cfg),
        Command::Config(ConfigCommand::Path) => {
            handle_config_path(source.as_ref());
            Ok(())
        }
        Command::ToolSchema => handle_tool_schema(),
        Command::Version => {
            handle_version();
            Ok(())
        }
    }
}

fn log_config_source(source: Option<&ConfigSource>) {
    match source {
        Some(ConfigSource::Default(path)) if !path.exists() => {
            debug!(path = %path.display(), "no config file, using defaults");
        }
        Some(source) => debug!(path = %source.path().display(), "loaded config"),
        None => debug!("no config directory, using defaults"),
    }
}

/// Sender used by `dispatch`; the CLI has no linked session.
pub fn dry_run_sender() -> DynWhatsAppSender {
    Arc::new(DryRunSender)
}

/// Parse the raw request argument (or stdin) as JSON.
pub async fn read_request(raw: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let text = if raw == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        raw.to_string()
    };
    Ok(serde_json::from_str(&text)?)
}

/// Parse and dispatch one request, returning the tool result JSON.
pub async fn dispatch_request(
    raw: &str,
    cfg: &Config,
    sender: &DynWhatsAppSender,
) -> Result<Value, Box<dyn std::error::Error>> {
    let params = read_request(raw).await?;
    let outcome = handle_whatsapp_action(&params, cfg, sender.as_ref()).await?;
    Ok(outcome.to_json())
}

/// Run the `dispatch` subcommand.
pub async fn handle_dispatch(
    raw: &str,
    cfg: &Config,
    sender: &DynWhatsAppSender,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = dispatch_request(raw, cfg, sender).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Run the `config show` subcommand.
pub fn handle_config_show(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(cfg)?);
    Ok(())
}

/// Run the `config path` subcommand.
pub fn handle_config_path(source: Option<&ConfigSource>) {
    match source {
        Some(source) => println!("{}", source.path().display()),
        None => println!("(no config directory available)"),
    }
}

/// Run the `tool-schema` subcommand.
pub fn handle_tool_schema() -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{}",
        serde_json::to_string_pretty(&whatsapp_tool_definition())?
    );
    Ok(())
}

/// Version line with the commit the binary was built from.
pub fn version_string() -> String {
    format!(
        "wa-action {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("WA_ACTIONS_GIT_REV")
    )
}

/// Run the `version` subcommand.
pub fn handle_version() {
    println!("{}", version_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["wa-action"]).is_err());
    }

    #[test]
    fn test_cli_dispatch_subcommand() {
        let cli = Cli::try_parse_from(["wa-action", "dispatch", r#"{"action":"poll"}"#]).unwrap();
        match cli.command {
            Command::Dispatch { ref request } => assert_eq!(request, r#"{"action":"poll"}"#),
            other => panic!("Expected Dispatch, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "wa-action",
            "config",
            "show",
            "--config",
            "/tmp/carapace.json5",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Show)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/carapace.json5")));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::try_parse_from(["wa-action", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_cli_tool_schema_and_version() {
        let cli = Cli::try_parse_from(["wa-action", "tool-schema"]).unwrap();
        assert!(matches!(cli.command, Command::ToolSchema));
        let cli = Cli::try_parse_from(["wa-action", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn test_cli_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["wa-action", "--log-format", "xml", "version"]).is_err());
    }

    #[tokio::test]
    async fn test_read_request_inline_json() {
        let value = read_request(r#"{"action": "react"}"#).await.unwrap();
        assert_eq!(value["action"], "react");
    }

    #[tokio::test]
    async fn test_config_path_skips_loading_broken_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ channels: ").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["wa-action", "--config", &path, "config", "path"]).unwrap();
        assert!(run(cli).await.is_ok());

        let cli = Cli::try_parse_from(["wa-action", "--config", &path, "config", "show"]).unwrap();
        assert!(run(cli).await.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_request_with_dry_run_sender() {
        let cfg = config::parse_config(
            "{channels: {whatsapp: {actions: {reactions: true}}}}",
            "inline",
        )
        .unwrap();
        let sender = dry_run_sender();
        let result = dispatch_request(
            r#"{"action":"react","chatJid":"123@s.whatsapp.net","messageId":"msg1","emoji":"👍"}"#,
            &cfg,
            &sender,
        )
        .await
        .unwrap();
        assert_eq!(result, serde_json::json!({"ok": true, "added": "👍"}));

        let err = dispatch_request(
            r#"{"action":"poll","chatJid":"123@s.whatsapp.net","question":"q","options":["a"]}"#,
            &cfg,
            &sender,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("WhatsApp polls are disabled"));
    }

    #[test]
    fn test_version_string_names_package_version() {
        let version = version_string();
        assert!(version.starts_with("wa-action "));
        assert!(version.contains(env!("CARGO_PKG_VERSION")));
        assert!(version.ends_with(')'));
    }

    #[tokio::test]
    async fn test_read_request_rejects_invalid_json() {
        assert!(read_request("{not json").await.is_err());
    }
}
