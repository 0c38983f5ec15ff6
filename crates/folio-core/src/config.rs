//! Site configuration: `config/folio.toml` (or `FOLIO_CONFIG`) layered under `FOLIO__*` env vars,
//! plus the webhook credentials that only the contact path reads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Server-side settings.
///
/// | Key | Env | Default |
/// |-----|-----|---------|
/// | bind_addr | FOLIO__BIND_ADDR | 127.0.0.1:8000 |
/// | content_path | FOLIO__CONTENT_PATH | (bundled content) |
/// | assets_dir | FOLIO__ASSETS_DIR | assets |
/// | orbit_seed | FOLIO__ORBIT_SEED | (no jitter) |
/// | webhook_timeout_secs | FOLIO__WEBHOOK_TIMEOUT_SECS | 10 |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub bind_addr: String,
    #[serde(default)]
    pub content_path: Option<String>,
    pub assets_dir: String,
    /// Seed for the orbit jitter. Unset keeps the rings rigid.
    #[serde(default)]
    pub orbit_seed: Option<u64>,
    pub webhook_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            content_path: None,
            assets_dir: "assets".to_string(),
            orbit_seed: None,
            webhook_timeout_secs: 10,
        }
    }
}

impl SiteConfig {
    /// Precedence: env `FOLIO__*` > file at `FOLIO_CONFIG` (default `config/folio`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("FOLIO_CONFIG").unwrap_or_else(|_| "config/folio".to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("assets_dir", defaults.assets_dir)?
            .set_default("webhook_timeout_secs", defaults.webhook_timeout_secs as i64)?;

        // `config::File` resolves a missing extension itself; only skip when nothing is there.
        let builder = builder.add_source(config::File::from(path).required(false));

        builder
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs.max(1))
    }

    pub fn content_path(&self) -> Option<PathBuf> {
        self.content_path
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}

/// Messaging webhook credentials. Missing values are tolerated here and fail at send time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    /// Read `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID` and `TELEGRAM_API_BASE`. Blank values count as unset.
    pub fn from_env(timeout: Duration) -> Self {
        Self {
            bot_token: env_opt_string("TELEGRAM_BOT_TOKEN"),
            chat_id: env_opt_string("TELEGRAM_CHAT_ID"),
            api_base: env_opt_string("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            timeout,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = SiteConfig::load_from(Path::new("does/not/exist/folio")).unwrap();
        assert_eq!(cfg.assets_dir, "assets");
        assert_eq!(cfg.webhook_timeout_secs, 10);
        assert!(cfg.orbit_seed.is_none());
        assert!(cfg.content_path().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "bind_addr = \"0.0.0.0:9000\"").unwrap();
        writeln!(file, "orbit_seed = 42").unwrap();
        writeln!(file, "content_path = \"  \"").unwrap();
        let cfg = SiteConfig::load_from(file.path()).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.orbit_seed, Some(42));
        assert!(cfg.content_path().is_none());
    }

    #[test]
    fn timeout_never_zero() {
        let cfg = SiteConfig {
            webhook_timeout_secs: 0,
            ..SiteConfig::default()
        };
        assert_eq!(cfg.webhook_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn webhook_config_completeness() {
        let mut cfg = WebhookConfig {
            bot_token: Some("token".into()),
            chat_id: None,
            api_base: DEFAULT_TELEGRAM_API_BASE.into(),
            timeout: Duration::from_secs(5),
        };
        assert!(!cfg.is_complete());
        cfg.chat_id = Some("1234".into());
        assert!(cfg.is_complete());
    }
}
