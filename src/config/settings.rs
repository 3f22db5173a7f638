//! Application settings loaded from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use super::constants::{
    DEFAULT_ADD_LANGUAGE_DATA, DEFAULT_ADMIN_EMAIL, DEFAULT_CREATE_REDUCED_COPIES,
    DEFAULT_DATABASE_URL, DEFAULT_EMPTY_DATABASE, DEFAULT_REDUCED_IMAGE_WIDTH,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SMTP_FROM, DEFAULT_SMTP_PORT,
    DEFAULT_STORAGE_ROOT, DEFAULT_TRANSCODER_COMMAND,
};

/// Configuration errors, reported before anything touches the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a boolean (1/0, true/false, yes/no, on/off), got {value:?}")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("PREFERRED_LOSSY_AUDIO_FORMAT must be one of ogg, mp3; got {0:?}")]
    InvalidAudioFormat(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Lossy audio container used for reduced-size copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Ogg,
    Mp3,
}

impl AudioFormat {
    /// File extension of the derivative
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Ogg => "ogg",
            AudioFormat::Mp3 => "mp3",
        }
    }

    /// Encoder name the transcoder must support
    pub fn encoder(&self) -> &'static str {
        match self {
            AudioFormat::Ogg => "libvorbis",
            AudioFormat::Mp3 => "libmp3lame",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ogg" => Ok(AudioFormat::Ogg),
            "mp3" => Ok(AudioFormat::Mp3),
            _ => Err(ConfigError::InvalidAudioFormat(s.to_string())),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// SMTP relay settings; present only when `SMTP_HOST` is set.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    password: String,
    pub from: String,
    pub use_tls: bool,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

impl SmtpConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        from: impl Into<String>,
        use_tls: bool,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            from: from.into(),
            use_tls,
        }
    }

    /// Relay password for SMTP authentication.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Application configuration.
///
/// Resolved once at startup and passed by reference; nothing mutates it
/// afterwards.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub storage_root: PathBuf,
    pub empty_database: bool,
    pub add_language_data: bool,
    pub language_data_path: Option<PathBuf>,
    pub create_reduced_size_file_copies: bool,
    pub preferred_lossy_audio_format: AudioFormat,
    pub transcoder_command: String,
    pub reduced_image_width: u32,
    pub admin_email: String,
    pub smtp: Option<SmtpConfig>,
    pub server_host: String,
    pub server_port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("storage_root", &self.storage_root)
            .field("empty_database", &self.empty_database)
            .field("add_language_data", &self.add_language_data)
            .field("language_data_path", &self.language_data_path)
            .field(
                "create_reduced_size_file_copies",
                &self.create_reduced_size_file_copies,
            )
            .field(
                "preferred_lossy_audio_format",
                &self.preferred_lossy_audio_format,
            )
            .field("transcoder_command", &self.transcoder_command)
            .field("reduced_image_width", &self.reduced_image_width)
            .field("admin_email", &self.admin_email)
            .field("smtp", &self.smtp)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    ///
    /// Unset and blank values fall back to defaults; malformed values are
    /// errors naming the offending key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let preferred_lossy_audio_format = match get("PREFERRED_LOSSY_AUDIO_FORMAT") {
            Some(v) => v.parse()?,
            None => AudioFormat::default(),
        };

        let transcoder_command =
            get("TRANSCODER_COMMAND").unwrap_or_else(|| DEFAULT_TRANSCODER_COMMAND.to_string());

        let smtp = match get("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: parse_number(get("SMTP_PORT"), "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                username: get("SMTP_USER").unwrap_or_default(),
                password: get("SMTP_PASS").unwrap_or_default(),
                from: get("SMTP_FROM").unwrap_or_else(|| DEFAULT_SMTP_FROM.to_string()),
                use_tls: parse_bool(get("SMTP_TLS"), "SMTP_TLS", true)?,
            }),
            None => None,
        };

        let reduced_image_width = parse_number(
            get("REDUCED_IMAGE_WIDTH"),
            "REDUCED_IMAGE_WIDTH",
            DEFAULT_REDUCED_IMAGE_WIDTH,
        )?;
        if reduced_image_width == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "REDUCED_IMAGE_WIDTH",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            storage_root: PathBuf::from(
                get("STORAGE_ROOT").unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string()),
            ),
            empty_database: parse_bool(
                get("EMPTY_DATABASE"),
                "EMPTY_DATABASE",
                DEFAULT_EMPTY_DATABASE,
            )?,
            add_language_data: parse_bool(
                get("ADD_LANGUAGE_DATA"),
                "ADD_LANGUAGE_DATA",
                DEFAULT_ADD_LANGUAGE_DATA,
            )?,
            language_data_path: get("LANGUAGE_DATA_PATH").map(PathBuf::from),
            create_reduced_size_file_copies: parse_bool(
                get("CREATE_REDUCED_SIZE_FILE_COPIES"),
                "CREATE_REDUCED_SIZE_FILE_COPIES",
                DEFAULT_CREATE_REDUCED_COPIES,
            )?,
            preferred_lossy_audio_format,
            transcoder_command,
            reduced_image_width,
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            smtp,
            server_host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_number(get("SERVER_PORT"), "SERVER_PORT", DEFAULT_SERVER_PORT)?,
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_bool(value: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value }),
    }
}

fn parse_number<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value: v }),
        None => Ok(default),
    }
}
