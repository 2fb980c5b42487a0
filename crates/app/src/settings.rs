use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/masareef.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub username: String,
    pub password: String,
    pub state_path: String,
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
            state_path: sync::default_state_path().to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "masareef", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override local fallback state path.
    #[arg(long)]
    state_path: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
}

pub fn load() -> Result<Settings, config::ConfigError> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MASAREEF"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok(settings)
}
