use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Service account key file
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE")]
    pub credentials: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub max_upload_bytes: usize,
    /// Directory for transient uploads; the system temp dir when unset.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GoogleConfig {
    pub credentials_file: PathBuf,
    /// Overrides the `token_uri` in the key file.
    #[serde(default)]
    pub token_uri: Option<String>,
    pub drive_api_base: String,
    pub drive_upload_base: String,
    pub docs_api_base: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ServerConfig {
    /// Directory transient uploads are written to.
    pub fn transient_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 5000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.max_upload_bytes", 50 * 1024 * 1024)?
            .set_default("google.credentials_file", "credentials/service-account.json")?
            .set_default("google.drive_api_base", "https://www.googleapis.com")?
            .set_default("google.drive_upload_base", "https://www.googleapis.com")?
            .set_default("google.docs_api_base", "https://docs.googleapis.com")?;

        // 2. Config file: explicit path is required, ./config.yaml is optional
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
        }

        // 3. Environment variables, e.g. EXTRACT_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("EXTRACT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (clap also fills these from PORT / GOOGLE_CREDENTIALS_FILE)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(credentials) = cli.credentials {
            builder = builder.set_override("google.credentials_file", credentials)?;
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.resolve_paths()?;
        Ok(cfg)
    }

    /// Anchor a relative credentials path at the working directory, once.
    fn resolve_paths(&mut self) -> Result<(), config::ConfigError> {
        if self.google.credentials_file.is_relative() {
            let cwd = std::env::current_dir().map_err(|e| {
                config::ConfigError::Message(format!("cannot resolve working directory: {e}"))
            })?;
            self.google.credentials_file = cwd.join(&self.google.credentials_file);
        }
        Ok(())
    }
}
