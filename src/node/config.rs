//! Node Configuration - defaults, saved JSON file, environment overrides

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::network::Network;
use crate::transfer::{FeePolicy, TransferSettings};

pub const ENV_ROOT: &str = "WBTC_NODE_ROOT";
pub const ENV_RPC_URL: &str = "WBTC_RPC_URL";
pub const ENV_NETWORK: &str = "WBTC_NETWORK";
pub const ENV_CONTRACT: &str = "WBTC_CONTRACT";
pub const ENV_WALLET_BRIDGE: &str = "WBTC_WALLET_BRIDGE";
pub const ENV_FEE_RATE: &str = "WBTC_FEE_RATE";
pub const ENV_PRIORITY_FEE: &str = "WBTC_PRIORITY_FEE";
pub const ENV_PORT: &str = "WBTC_PORT";

/// Node configuration. Unset `rpc_url`/`contract_address` fall back to the
/// network's known values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub app: String,
    pub network: Network,
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    /// Wallet bridge JSON-RPC endpoint. No bridge means no signer.
    pub wallet_bridge_url: Option<String>,
    /// sat/vB
    pub fee_rate: u64,
    pub priority_fee: u64,
    pub utxo_min_amount: u64,
    pub utxo_requested_amount: u64,
    pub supply_refresh_secs: u64,
    pub port: u16,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let fees = FeePolicy::default();
        let settings = TransferSettings::default();
        Self {
            app: "wbtc".into(),
            network: Network::default(),
            rpc_url: None,
            contract_address: None,
            wallet_bridge_url: None,
            fee_rate: fees.fee_rate,
            priority_fee: fees.priority_fee,
            utxo_min_amount: settings.utxo_min_amount,
            utxo_requested_amount: settings.utxo_requested_amount,
            supply_refresh_secs: 30,
            port: 8080,
        }
    }
}

impl NodeConfig {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into(), ..Default::default() }
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn with_contract(mut self, address: impl Into<String>) -> Self {
        self.contract_address = Some(address.into());
        self
    }

    pub fn with_wallet_bridge(mut self, url: impl Into<String>) -> Self {
        self.wallet_bridge_url = Some(url.into());
        self
    }

    pub fn with_fees(mut self, fee_rate: u64, priority_fee: u64) -> Self {
        self.fee_rate = fee_rate;
        self.priority_fee = priority_fee;
        self
    }

    pub fn with_utxo_limits(mut self, min: u64, requested: u64) -> Self {
        self.utxo_min_amount = min;
        self.utxo_requested_amount = requested;
        self
    }

    pub fn with_supply_refresh(mut self, every: Duration) -> Self {
        self.supply_refresh_secs = every.as_secs();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Defaults overridden by `WBTC_*` variables.
    pub fn from_env(app: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(app).apply_env()
    }

    /// Saved config for `app` if there is one, then `WBTC_*` overrides.
    pub fn resolve(app: &str) -> Result<Self, ConfigError> {
        Self::load(app)?.unwrap_or_else(|| Self::new(app)).apply_env()
    }

    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(raw) = env_value(ENV_NETWORK) {
            self.network = Network::parse(&raw)
                .ok_or_else(|| ConfigError::Invalid {
                    field: "network",
                    reason: format!("unknown network '{}'", raw),
                })?;
        }
        if let Some(url) = env_value(ENV_RPC_URL) { self.rpc_url = Some(url); }
        if let Some(address) = env_value(ENV_CONTRACT) { self.contract_address = Some(address); }
        if let Some(url) = env_value(ENV_WALLET_BRIDGE) { self.wallet_bridge_url = Some(url); }
        if let Some(raw) = env_value(ENV_FEE_RATE) { self.fee_rate = parse_number("fee_rate", &raw)?; }
        if let Some(raw) = env_value(ENV_PRIORITY_FEE) { self.priority_fee = parse_number("priority_fee", &raw)?; }
        if let Some(raw) = env_value(ENV_PORT) {
            self.port = raw.parse().map_err(|e| ConfigError::Invalid { field: "port", reason: format!("{}", e) })?;
        }
        Ok(self)
    }

    pub fn effective_rpc_url(&self) -> Result<String, ConfigError> {
        match self.rpc_url.as_deref().map(str::trim) {
            Some("") => Err(ConfigError::Invalid { field: "rpc_url", reason: "empty".into() }),
            Some(url) => Ok(url.to_string()),
            None => self.network.default_rpc_url().map(String::from).ok_or(ConfigError::Missing("rpc_url")),
        }
    }

    pub fn effective_contract(&self) -> Result<String, ConfigError> {
        match self.contract_address.as_deref().map(str::trim) {
            Some("") => Err(ConfigError::Invalid { field: "contract_address", reason: "empty".into() }),
            Some(address) => Ok(address.to_string()),
            None => self.network.default_contract().map(String::from).ok_or(ConfigError::Missing("contract_address")),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.trim().is_empty() {
            return Err(ConfigError::Missing("app"));
        }
        self.effective_rpc_url()?;
        self.effective_contract()?;
        if matches!(self.wallet_bridge_url.as_deref().map(str::trim), Some("")) {
            return Err(ConfigError::Invalid { field: "wallet_bridge_url", reason: "empty".into() });
        }
        if self.fee_rate == 0 {
            return Err(ConfigError::Invalid { field: "fee_rate", reason: "must be positive".into() });
        }
        if self.utxo_min_amount > self.utxo_requested_amount {
            return Err(ConfigError::Invalid {
                field: "utxo_min_amount",
                reason: format!("{} exceeds requested amount {}", self.utxo_min_amount, self.utxo_requested_amount),
            });
        }
        if self.supply_refresh_secs == 0 {
            return Err(ConfigError::Invalid { field: "supply_refresh_secs", reason: "must be positive".into() });
        }
        Ok(())
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            fees: FeePolicy { fee_rate: self.fee_rate, priority_fee: self.priority_fee },
            utxo_min_amount: self.utxo_min_amount,
            utxo_requested_amount: self.utxo_requested_amount,
        }
    }

    pub fn supply_refresh(&self) -> Duration { Duration::from_secs(self.supply_refresh_secs) }

    /// `$WBTC_NODE_ROOT/<app>/config.json`, or under the platform data dir.
    pub fn config_path(app: &str) -> PathBuf {
        let root = std::env::var(ENV_ROOT)
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("wbtc-node"));
        root.join(app).join("config.json")
    }

    pub fn load(app: &str) -> Result<Option<Self>, ConfigError> {
        let path = Self::config_path(app);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path(&self.app);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::File(format!("{}: {}", parent.display(), e)))?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(|e| ConfigError::File(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::File(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_number(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Invalid { field, reason: format!("'{}': {}", raw, e) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_funding_constants() {
        let config = NodeConfig::new("demo");
        assert_eq!(config.fee_rate, 450);
        assert_eq!(config.priority_fee, 10_000);
        assert_eq!(config.utxo_min_amount, 10_000);
        assert_eq!(config.utxo_requested_amount, 100_000);
        assert_eq!(config.supply_refresh(), Duration::from_secs(30));
        assert_eq!(config.effective_rpc_url().unwrap(), "https://regtest.opnet.org");
    }

    #[test]
    fn regtest_needs_an_explicit_contract() {
        let config = NodeConfig::new("demo");
        assert!(matches!(config.validate(), Err(ConfigError::Missing("contract_address"))));
        assert!(config.with_contract("bcrt1pcontract").validate().is_ok());
    }

    #[test]
    fn testnet_has_known_endpoints() {
        let config = NodeConfig::new("demo").with_network(Network::Testnet);
        assert_eq!(config.effective_rpc_url().unwrap(), "https://testnet.opnet.org");
        assert!(config.effective_contract().unwrap().starts_with("tb1p"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let base = NodeConfig::new("demo").with_contract("bcrt1pcontract");
        assert!(base.clone().with_fees(0, 1).validate().is_err());
        assert!(base.clone().with_utxo_limits(200_000, 100_000).validate().is_err());
        assert!(base.clone().with_rpc_url("  ").validate().is_err());
        assert!(base.clone().with_wallet_bridge("").validate().is_err());
        assert!(matches!(
            NodeConfig::new("demo").with_network(Network::Bitcoin).validate(),
            Err(ConfigError::Missing("rpc_url"))
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: NodeConfig = serde_json::from_str(r#"{"app":"x","network":"testnet","fee_rate":99}"#).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.fee_rate, 99);
        assert_eq!(config.port, 8080);
    }
}
