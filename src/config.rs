use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Traded market in QUOTE-BASE form.
    #[serde(default = "default_ticker")]
    pub ticker: String,
    /// Smallest order the exchange accepts, in quote currency.
    #[serde(default = "default_min_order_krw")]
    pub min_order_krw: f64,
    /// Fraction of the quote balance spendable on a market buy after fees.
    #[serde(default = "default_buy_fee_factor")]
    pub buy_fee_factor: f64,
    /// Log orders instead of submitting them.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_ticker() -> String {
    "KRW-BTC".to_string()
}

fn default_min_order_krw() -> f64 {
    5_000.0
}

fn default_buy_fee_factor() -> f64 {
    0.9995
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

/// API credentials, supplied through the environment and never through
/// config files.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub upbit_access_key: String,
    #[serde(default)]
    pub upbit_secret_key: String,
    #[serde(default)]
    pub openai_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_server_config")]
    pub server: ServerConfig,
    #[serde(default = "default_trading_config")]
    pub trading: TradingConfig,
    #[serde(default = "default_agent_config")]
    pub agent: AgentConfig,
    #[serde(default = "default_credentials")]
    pub credentials: Credentials,
}

fn default_server_config() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

fn default_trading_config() -> TradingConfig {
    TradingConfig {
        ticker: default_ticker(),
        min_order_krw: default_min_order_krw(),
        buy_fee_factor: default_buy_fee_factor(),
        dry_run: false,
    }
}

fn default_agent_config() -> AgentConfig {
    AgentConfig {
        model: default_model(),
        api_base: default_api_base(),
    }
}

fn default_credentials() -> Credentials {
    Credentials {
        upbit_access_key: String::new(),
        upbit_secret_key: String::new(),
        openai_api_key: String::new(),
    }
}

impl Settings {
    /// Load `config/{RUN_MODE}.toml` if present, apply environment
    /// overrides, then validate. Credentials come from the environment
    /// only; startup fails fast when one is missing.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        for (env_key, config_key) in [
            ("UPBIT_ACCESS_KEY", "credentials.upbit_access_key"),
            ("UPBIT_SECRET_KEY", "credentials.upbit_secret_key"),
            ("OPENAI_API_KEY", "credentials.openai_api_key"),
        ] {
            if let Ok(value) = std::env::var(env_key) {
                builder = builder.set_override(config_key, value)?;
            }
        }

        if let Ok(ticker) = std::env::var("TRADING_TICKER") {
            builder = builder.set_override("trading.ticker", ticker)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("UPBIT_ACCESS_KEY", &self.credentials.upbit_access_key),
            ("UPBIT_SECRET_KEY", &self.credentials.upbit_secret_key),
            ("OPENAI_API_KEY", &self.credentials.openai_api_key),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} is not set", name)));
            }
        }

        if !self.trading.ticker.contains('-') {
            return Err(ConfigError::Message(format!(
                "trading.ticker '{}' is not in QUOTE-BASE form",
                self.trading.ticker
            )));
        }
        if self.trading.min_order_krw <= 0.0 {
            return Err(ConfigError::Message(
                "trading.min_order_krw must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.trading.buy_fee_factor) {
            return Err(ConfigError::Message(
                "trading.buy_fee_factor must be within (0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_credentials(access: &str, secret: &str, openai: &str) -> Settings {
        Settings {
            server: default_server_config(),
            trading: default_trading_config(),
            agent: default_agent_config(),
            credentials: Credentials {
                upbit_access_key: access.to_string(),
                upbit_secret_key: secret.to_string(),
                openai_api_key: openai.to_string(),
            },
        }
    }

    #[test]
    fn test_validate_accepts_complete_settings() {
        let settings = settings_with_credentials("a", "s", "o");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_credential() {
        let settings = settings_with_credentials("a", "", "o");
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("UPBIT_SECRET_KEY"));
    }

    #[test]
    fn test_validate_rejects_bad_ticker() {
        let mut settings = settings_with_credentials("a", "s", "o");
        settings.trading.ticker = "KRWBTC".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let trading = default_trading_config();
        assert_eq!(trading.ticker, "KRW-BTC");
        assert_eq!(trading.min_order_krw, 5_000.0);
        assert_eq!(trading.buy_fee_factor, 0.9995);
        assert!(!trading.dry_run);
    }
}
