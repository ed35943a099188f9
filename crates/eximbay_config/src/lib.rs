use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};
pub mod models;
pub use models::*;

/// Marker value in config files meaning "read this from the environment".
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Loads the layered application configuration.
///
/// Sources, lowest precedence first:
/// 1. `<CONFIG_DIR>/default.*`
/// 2. `<CONFIG_DIR>/<RUN_ENV>.*`
/// 3. environment variables `<PREFIX>__SECTION__KEY` (prefix defaults to `EXIMBAY`)
///
/// Afterwards every `"secret_from_env"` value is replaced from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "EXIMBAY".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values using `lookup`.
///
/// The variable name is the upper-cased key path joined with `_`,
/// so `eximbay.api_key` is read from `EXIMBAY_API_KEY`.
fn inject_env_secrets<F>(value: &mut Value, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    fn walk<F>(path: &mut Vec<String>, obj: &mut Value, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v, lookup);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                match lookup(&env_key) {
                    Some(env_val) => *obj = Value::String(env_val),
                    None => {
                        warn!("env var {} not found for {}", env_key, SECRET_FROM_ENV);
                        *obj = Value::String(String::new());
                    }
                }
            }
            _ => {}
        }
    }

    walk(&mut Vec::new(), value, lookup);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    apply_overrides_with(config, |key| env::var(key).ok())
}

fn apply_overrides_with<F>(config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json, &lookup);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// `DOTENV_OVERRIDE` wins, then a first CLI argument starting with `.env`,
/// then `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            http: HttpClientConfig::default(),
            eximbay: EximbayConfig {
                api_ready_url: "https://api-test.eximbay.com/v1/payments/ready".to_string(),
                api_key: SECRET_FROM_ENV.to_string(),
                merchant_id: "1849705C64".to_string(),
                api_key_token: SECRET_FROM_ENV.to_string(),
                merchant_id_token: "TOKENMID".to_string(),
                request_base_url: "https://example.test".to_string(),
                ..EximbayConfig::default()
            },
        }
    }

    #[test]
    fn test_marker_values_are_replaced_from_lookup() {
        let config = apply_overrides_with(sample_config(), |key| match key {
            "EXIMBAY_API_KEY" => Some("key-standard".to_string()),
            "EXIMBAY_API_KEY_TOKEN" => Some("key-token".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.eximbay.api_key, "key-standard");
        assert_eq!(config.eximbay.api_key_token, "key-token");
        assert_eq!(config.eximbay.merchant_id, "1849705C64");
    }

    #[test]
    fn test_unresolved_marker_becomes_empty() {
        let config = apply_overrides_with(sample_config(), |_| None).unwrap();

        assert_eq!(config.eximbay.api_key, "");
        assert_eq!(
            config.eximbay.missing_credentials(),
            vec!["api_key", "api_key_token"]
        );
    }

    #[test]
    fn test_fixture_defaults_match_observed_values() {
        let eximbay: EximbayConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(eximbay.api_base_url, "https://api-test.eximbay.com/v1");
        assert_eq!(eximbay.fixtures.buyer_name, "eximbay");
        assert_eq!(eximbay.fixtures.buyer_email, "test@eximbay.com");
        assert_eq!(eximbay.fixtures.partner_tag, "TIGERBOOKING");
        assert_eq!(eximbay.fixtures.fast_payment_user_id, "edgar");
    }

    #[test]
    fn test_debug_output_redacts_keys() {
        let mut config = sample_config();
        config.eximbay.api_key = "super-secret".to_string();

        let debug = format!("{:?}", config.eximbay);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
