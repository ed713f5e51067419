use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Rpc {
    #[serde(default = "default_http_url")]
    pub http_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

fn default_http_url() -> String {
    // Monad testnet, the network the default protocol registry targets.
    "https://testnet-rpc.monad.xyz".to_string()
}

fn default_chain_id() -> u64 {
    10143
}

impl Default for Rpc {
    fn default() -> Self {
        Self {
            http_url: default_http_url(),
            chain_id: default_chain_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Discovery {
    /// Pairs fetched concurrently per batch during factory enumeration.
    #[serde(default = "default_pair_batch_size")]
    pub pair_batch_size: u64,
    /// Whether token resolution should also read the optional `name()` field.
    #[serde(default = "default_fetch_token_names")]
    pub fetch_token_names: bool,
}

fn default_pair_batch_size() -> u64 {
    10
}

fn default_fetch_token_names() -> bool {
    true
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            pair_batch_size: default_pair_batch_size(),
            fetch_token_names: default_fetch_token_names(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// One DEX protocol entry as it appears in configuration. Addresses are kept
/// as strings here; parsing and validation happen when the registry is built.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct ProtocolSettings {
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub factory_address: Option<String>,
    #[serde(default)]
    pub router_address: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub rpc: Rpc,
    #[serde(default)]
    pub discovery: Discovery,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default = "default_protocols")]
    pub protocols: Vec<ProtocolSettings>,
}

/// Protocols known on the default network. Factory addresses are unset until
/// the deployments publish them; such entries still resolve direct pair
/// lookups once an address is configured, and are skipped for enumeration.
fn default_protocols() -> Vec<ProtocolSettings> {
    vec![
        ProtocolSettings {
            name: "MonadSwap".to_string(),
            website: "https://monadswap.xyz".to_string(),
            factory_address: None,
            router_address: None,
            is_active: true,
        },
        ProtocolSettings {
            name: "Uniswap V2 Fork".to_string(),
            website: "https://uniswap.org".to_string(),
            factory_address: None,
            router_address: None,
            is_active: true,
        },
    ]
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("Config.toml")
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        if settings.protocols.is_empty() {
            settings.protocols = default_protocols();
        }
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("SDK_RPC_HTTP_URL") {
            self.rpc.http_url = url;
        }
        if let Ok(chain_id) = std::env::var("SDK_RPC_CHAIN_ID") {
            self.rpc.chain_id = chain_id.parse().map_err(|_| {
                ConfigError::Message(format!("SDK_RPC_CHAIN_ID is not a number: `{chain_id}`"))
            })?;
        }
        if let Ok(raw) = std::env::var("SDK_DEX_PROTOCOLS") {
            self.protocols = serde_json::from_str(&raw).map_err(|e| {
                ConfigError::Message(format!("SDK_DEX_PROTOCOLS is not valid JSON: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Initializes the global logger from the configured level. Safe to call
/// more than once; later calls are no-ops.
pub fn init_logging(log: &LogSettings) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&log.level))
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // Environment variables are process-global; every test that loads
    // settings takes this lock so overrides cannot leak between tests.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clean_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::env::remove_var("SDK_RPC_HTTP_URL");
        std::env::remove_var("SDK_RPC_CHAIN_ID");
        std::env::remove_var("SDK_DEX_PROTOCOLS");
        guard
    }

    #[test]
    fn defaults_target_monad_testnet() {
        let settings = Settings::default();
        assert_eq!(settings.rpc.chain_id, 10143);
        assert_eq!(settings.rpc.http_url, "https://testnet-rpc.monad.xyz");
        assert_eq!(settings.discovery.pair_batch_size, 10);
        assert!(settings.discovery.fetch_token_names);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let _env = clean_env();
        let settings = Settings::from_file("does_not_exist_anywhere").unwrap();
        assert_eq!(settings.rpc.chain_id, 10143);
        assert_eq!(settings.protocols.len(), 2);
        assert_eq!(settings.protocols[0].name, "MonadSwap");
    }

    #[test]
    fn reads_protocols_from_toml() {
        let _env = clean_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[rpc]
http_url = "http://localhost:8545"
chain_id = 31337

[discovery]
pair_batch_size = 25

[[protocols]]
name = "LocalSwap"
factory_address = "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"
"#
        )
        .unwrap();

        let settings = Settings::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.rpc.http_url, "http://localhost:8545");
        assert_eq!(settings.rpc.chain_id, 31337);
        assert_eq!(settings.discovery.pair_batch_size, 25);
        assert_eq!(settings.protocols.len(), 1);
        assert_eq!(settings.protocols[0].name, "LocalSwap");
        assert!(settings.protocols[0].is_active);
        assert!(settings.protocols[0].factory_address.is_some());
    }

    #[test]
    fn env_variables_override_file_values() {
        let _env = clean_env();
        std::env::set_var("SDK_RPC_HTTP_URL", "http://override:8545");
        std::env::set_var("SDK_RPC_CHAIN_ID", "1");
        std::env::set_var(
            "SDK_DEX_PROTOCOLS",
            r#"[{"name": "EnvSwap", "factory_address": "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"}]"#,
        );

        let settings = Settings::from_file("does_not_exist_anywhere").unwrap();
        std::env::remove_var("SDK_RPC_HTTP_URL");
        std::env::remove_var("SDK_RPC_CHAIN_ID");
        std::env::remove_var("SDK_DEX_PROTOCOLS");

        assert_eq!(settings.rpc.http_url, "http://override:8545");
        assert_eq!(settings.rpc.chain_id, 1);
        assert_eq!(settings.protocols.len(), 1);
        assert_eq!(settings.protocols[0].name, "EnvSwap");
        assert!(settings.protocols[0].is_active);
    }

    #[test]
    fn non_numeric_chain_id_override_is_rejected() {
        let _env = clean_env();
        std::env::set_var("SDK_RPC_CHAIN_ID", "mainnet");
        let result = Settings::from_file("does_not_exist_anywhere");
        std::env::remove_var("SDK_RPC_CHAIN_ID");

        let err = result.unwrap_err().to_string();
        assert!(err.contains("SDK_RPC_CHAIN_ID"));
    }

    #[test]
    fn invalid_protocol_json_override_is_rejected() {
        let _env = clean_env();
        std::env::set_var("SDK_DEX_PROTOCOLS", "not json");
        let result = Settings::from_file("does_not_exist_anywhere");
        std::env::remove_var("SDK_DEX_PROTOCOLS");

        let err = result.unwrap_err().to_string();
        assert!(err.contains("SDK_DEX_PROTOCOLS"));
    }
}
