//! tinychat CLI: terminal client for a local chat inference server

use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tinychat_engine::{ChatSession, Config, ConfigError, HttpChatClient, Submission};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Chat with a local inference server from the terminal
#[derive(Parser)]
#[command(name = "tinychat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    overrides: ConfigArgs,

    /// Config file (default: .tinychat/config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Settings that override the config file.
#[derive(Args, Debug, Default, Clone)]
struct ConfigArgs {
    /// Server base URL, e.g. http://127.0.0.1:5000
    #[arg(long, global = true, env = "TINYCHAT_BASE_URL")]
    base_url: Option<String>,

    /// Model identifier sent with each request
    #[arg(long, global = true, env = "TINYCHAT_MODEL")]
    model: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "TINYCHAT_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat screen (default when no command specified)
    Tui,

    /// Send one prompt and print the reply
    Send {
        /// Prompt text
        prompt: String,
    },

    /// Print the effective configuration
    Config,

    /// Write the effective configuration to .tinychat/config.json
    Init,
}

fn main() {
    let cli = Cli::parse();
    let is_tui = matches!(cli.command, None | Some(Commands::Tui));

    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref(), is_tui) {
        eprintln!("Error: failed to open log file: {e}");
        std::process::exit(1);
    }

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: failed to get current directory: {e}");
            std::process::exit(1);
        }
    };

    let config = match resolve_config(cli.config.as_deref(), &root, &cli.overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    debug!(?config, "resolved config");

    match cli.command {
        None | Some(Commands::Tui) => cmd_tui(&config),
        Some(Commands::Send { prompt }) => cmd_send(&config, prompt),
        Some(Commands::Config) => cmd_config(&config),
        Some(Commands::Init) => cmd_init(&config, &root),
    }
}

/// Install the global subscriber.
///
/// The TUI owns the terminal, so it only logs when a file is given.
fn init_logging(verbose: bool, log_file: Option<&Path>, is_tui: bool) -> std::io::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tinychat={level}")));

    match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if is_tui => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Layer defaults, the config file, and overrides, then validate.
///
/// An explicit `--config` must exist; the default location is optional.
fn resolve_config(
    explicit: Option<&Path>,
    root: &Path,
    overrides: &ConfigArgs,
) -> Result<Config, ConfigError> {
    let mut config = match explicit {
        Some(path) => Config::load(path)?,
        None => {
            let path = Config::default_path(root);
            if path.exists() {
                Config::load(&path)?
            } else {
                Config::default()
            }
        }
    };

    if let Some(base_url) = &overrides.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(model) = &overrides.model {
        config.model.clone_from(model);
    }
    if overrides.timeout_ms.is_some() {
        config.timeout_ms = overrides.timeout_ms;
    }

    config.validate()?;
    Ok(config)
}

fn build_client(config: &Config) -> HttpChatClient {
    match HttpChatClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to create HTTP client: {e}");
            std::process::exit(1);
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_tui(config: &Config) {
    let client = build_client(config);
    let rt = runtime();
    if let Err(e) = rt.block_on(tinychat_tui::run_tui(Arc::new(client), &config.model)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_send(config: &Config, prompt: String) {
    let client = build_client(config);
    let rt = runtime();

    let mut session = ChatSession::new();
    session.edit_input(prompt);

    match rt.block_on(session.submit(&client)) {
        Submission::Started(_) => {}
        Submission::Empty => {
            eprintln!("Error: prompt is empty");
            std::process::exit(1);
        }
        Submission::Busy => {
            eprintln!("Error: a request is already in flight");
            std::process::exit(1);
        }
    }

    let Some(reply) = session.messages().last() else {
        eprintln!("Error: no reply recorded");
        std::process::exit(1);
    };
    println!("{}", reply.display_text());

    if reply.error().is_some() {
        std::process::exit(1);
    }
}

fn cmd_config(config: &Config) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to serialize config: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_init(config: &Config, root: &Path) {
    let config_path = Config::default_path(root);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    match config.save(&config_path) {
        Ok(()) => {
            info!(path = %config_path.display(), "wrote config");
            println!("Created {}", config_path.display());
        }
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn write_config(dir: &Path, json: &str) -> PathBuf {
        let path = Config::default_path(dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_send_with_flags() {
        let cli = Cli::try_parse_from([
            "tinychat",
            "send",
            "hello there",
            "--base-url",
            "http://localhost:5000",
            "--timeout-ms",
            "2000",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Send { ref prompt }) if prompt == "hello there"));
        assert_eq!(cli.overrides.base_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(cli.overrides.timeout_ms, Some(2000));
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(None, dir.path(), &ConfigArgs::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), r#"{"model":"llama3","timeoutMs":5000}"#);

        let config = resolve_config(None, dir.path(), &ConfigArgs::default()).unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timeout_ms, Some(5000));
        assert_eq!(config.base_url, Config::default().base_url);
    }

    #[test]
    fn test_overrides_beat_config_file() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), r#"{"model":"llama3","baseUrl":"http://10.0.0.2:5000"}"#);

        let overrides = ConfigArgs {
            base_url: Some("http://127.0.0.1:8080/".into()),
            model: None,
            timeout_ms: Some(100),
        };
        let config = resolve_config(None, dir.path(), &overrides).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timeout_ms, Some(100));
        assert_eq!(config.chat_url(), "http://127.0.0.1:8080/chat");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let result = resolve_config(Some(&missing), dir.path(), &ConfigArgs::default());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = ConfigArgs {
            timeout_ms: Some(0),
            ..ConfigArgs::default()
        };
        let result = resolve_config(None, dir.path(), &overrides);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_init_leaves_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"model":"keep-me"}"#);

        let config = Config {
            model: "other".into(),
            ..Config::default()
        };
        cmd_init(&config, dir.path());

        assert_eq!(Config::load(&path).unwrap().model, "keep-me");
    }

    #[test]
    fn test_init_writes_effective_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            model: "gemma3".into(),
            ..Config::default()
        };
        cmd_init(&config, dir.path());

        let path = Config::default_path(dir.path());
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
