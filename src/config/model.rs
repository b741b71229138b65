//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box
//! with simulated wallets.

use crate::app::store::CollateralAsset;
use serde::{Deserialize, Deserializer, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub wallets: WalletsConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub flows: FlowConfig,
    #[serde(default)]
    pub position: PositionConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Wallet adapters offered per chain family, in the order the connection
/// dialog lists them. Each section accepts a single `[wallets.solana]` table
/// or a list of `[[wallets.solana]]` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletsConfig {
    #[serde(default = "default_solana_wallets", deserialize_with = "solana_adapters")]
    pub solana: Vec<WalletConfig>,
    #[serde(default = "default_evm_wallets", deserialize_with = "evm_adapters")]
    pub evm: Vec<WalletConfig>,
}

impl Default for WalletsConfig {
    fn default() -> Self {
        Self {
            solana: default_solana_wallets(),
            evm: default_evm_wallets(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    // Tried first: an empty array would otherwise pass as a defaulted table.
    Many(Vec<WalletConfig>),
    One(WalletConfig),
}

fn adapters<'de, D>(
    deserializer: D,
    default_name: &str,
    fallback: fn() -> Vec<WalletConfig>,
) -> Result<Vec<WalletConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut list = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(cfg) => vec![cfg],
        OneOrMany::Many(list) => list,
    };
    if list.is_empty() {
        return Ok(fallback());
    }
    for cfg in &mut list {
        if cfg.name.trim().is_empty() {
            cfg.name = default_name.to_string();
        }
    }
    Ok(list)
}

fn solana_adapters<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<WalletConfig>, D::Error> {
    adapters(deserializer, "Phantom", default_solana_wallets)
}

fn evm_adapters<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<WalletConfig>, D::Error> {
    adapters(deserializer, "MetaMask", default_evm_wallets)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Answers from configuration after a delay.
    Simulated,
    /// Watch-only address, balances read over JSON-RPC.
    Rpc,
}

/// How a simulated provider answers an account request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulatedOutcome {
    Approve,
    Reject,
    Pending,
    Missing,
}

/// Settings for a single chain wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
    /// Wallet label shown in the connection dialog (e.g. `"Phantom"`).
    /// Left empty, the chain's usual wallet name is used.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Balance reported by the simulated provider, in native units.
    #[serde(default)]
    pub balance: f64,
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    #[serde(default = "default_outcome")]
    pub outcome: SimulatedOutcome,
    #[serde(default)]
    pub rpc_url: Option<String>,
}

/// Periodic balance refresh while wallets are connected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_balance_interval")]
    pub balance_interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            balance_interval_secs: default_balance_interval(),
        }
    }
}

/// Simulated confirmation delays, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default = "default_identity_ms")]
    pub identity_ms: u64,
    #[serde(default = "default_approve_ms")]
    pub approve_ms: u64,
    #[serde(default = "default_deposit_ms")]
    pub deposit_ms: u64,
    #[serde(default = "default_borrow_ms")]
    pub borrow_ms: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            identity_ms: default_identity_ms(),
            approve_ms: default_approve_ms(),
            deposit_ms: default_deposit_ms(),
            borrow_ms: default_borrow_ms(),
        }
    }
}

/// Mock position the session starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionConfig {
    #[serde(default = "default_trust_score")]
    pub trust_score: u32,
    #[serde(default = "default_total_debt")]
    pub total_debt: f64,
    #[serde(default = "default_collateral")]
    pub collateral: Vec<CollateralAsset>,
    #[serde(default = "default_weth_price")]
    pub weth_price_usd: f64,
    #[serde(default = "default_wallet_weth")]
    pub wallet_weth_balance: f64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            trust_score: default_trust_score(),
            total_debt: default_total_debt(),
            collateral: default_collateral(),
            weth_price_usd: default_weth_price(),
            wallet_weth_balance: default_wallet_weth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// View shown right after onboarding: dashboard, deposit or borrow.
    #[serde(default = "default_start_view")]
    pub start_view: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_view: default_start_view(),
            tick_ms: default_tick_ms(),
        }
    }
}

/// Diagnostic log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: default_log_dir(),
            level: default_log_level(),
        }
    }
}

fn simulated(name: &str, address: &str, balance: f64) -> WalletConfig {
    WalletConfig {
        provider: ProviderKind::Simulated,
        name: name.into(),
        address: Some(address.into()),
        balance,
        latency_ms: default_latency_ms(),
        outcome: SimulatedOutcome::Approve,
        rpc_url: None,
    }
}
fn default_solana_wallets() -> Vec<WalletConfig> {
    vec![
        simulated("Phantom", "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU", 12.5),
        simulated("Solflare", "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM", 4.2),
    ]
}
fn default_evm_wallets() -> Vec<WalletConfig> {
    vec![simulated("MetaMask", "0x742d35Cc6634C0532925a3b8D4C9db96590b5c8e", 0.8)]
}
fn default_provider() -> ProviderKind {
    ProviderKind::Simulated
}
fn default_outcome() -> SimulatedOutcome {
    SimulatedOutcome::Approve
}
fn default_latency_ms() -> u64 {
    500
}
fn default_balance_interval() -> u64 {
    10
}
fn default_identity_ms() -> u64 {
    1000
}
fn default_approve_ms() -> u64 {
    2000
}
fn default_deposit_ms() -> u64 {
    5000
}
fn default_borrow_ms() -> u64 {
    1000
}
fn default_trust_score() -> u32 {
    750
}
fn default_total_debt() -> f64 {
    5_000.0
}
fn default_collateral() -> Vec<CollateralAsset> {
    vec![CollateralAsset {
        symbol: "WETH".into(),
        name: "Wrapped Ether".into(),
        chain: "Sepolia".into(),
        amount: 10.0,
        value: 30_000.0,
    }]
}
fn default_weth_price() -> f64 {
    3_000.0
}
fn default_wallet_weth() -> f64 {
    15.5
}
fn default_start_view() -> String {
    "dashboard".to_string()
}
fn default_tick_ms() -> u64 {
    250
}
fn default_true() -> bool {
    true
}
fn default_log_dir() -> String {
    "~/.local/share/meridian/logs".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        let solana: Vec<&str> = cfg.wallets.solana.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(solana, ["Phantom", "Solflare"]);
        assert_eq!(cfg.wallets.evm.len(), 1);
        assert_eq!(cfg.wallets.evm[0].balance, 0.8);
        assert_eq!(cfg.refresh.balance_interval_secs, 10);
        assert_eq!(cfg.flows.deposit_ms, 5000);
        assert_eq!(cfg.position.collateral.len(), 1);
        assert_eq!(cfg.ui.start_view, "dashboard");
    }

    #[test]
    fn test_single_table_override() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [wallets.evm]
            provider = "rpc"
            name = "MetaMask"
            address = "0xabc"
            rpc_url = "http://localhost:8545"

            [wallets.solana]
            name = "Solflare"
            outcome = "reject"

            [position]
            trust_score = 300
            total_debt = 0.0
            collateral = []
            "#,
        )
        .unwrap();
        assert_eq!(cfg.wallets.evm.len(), 1);
        assert_eq!(cfg.wallets.evm[0].provider, ProviderKind::Rpc);
        assert_eq!(cfg.wallets.evm[0].rpc_url.as_deref(), Some("http://localhost:8545"));
        let solana = &cfg.wallets.solana[0];
        assert_eq!(solana.name, "Solflare");
        assert_eq!(solana.outcome, SimulatedOutcome::Reject);
        assert_eq!(solana.provider, ProviderKind::Simulated);
        assert_eq!(solana.latency_ms, 500);
        assert_eq!(cfg.position.trust_score, 300);
        assert!(cfg.position.collateral.is_empty());
        assert_eq!(cfg.position.weth_price_usd, 3_000.0);
    }

    #[test]
    fn test_wallet_name_defaults_per_chain() {
        let cfg: AppConfig = toml::from_str("[wallets.evm]\nprovider = \"rpc\"\naddress = \"0xabc\"\n").unwrap();
        assert_eq!(cfg.wallets.evm[0].name, "MetaMask");
        assert_eq!(cfg.wallets.evm[0].provider, ProviderKind::Rpc);
        assert_eq!(cfg.wallets.evm[0].address.as_deref(), Some("0xabc"));

        let cfg: AppConfig = toml::from_str("[wallets.solana]\nbalance = 2.0\n").unwrap();
        assert_eq!(cfg.wallets.solana[0].name, "Phantom");
    }

    #[test]
    fn test_adapter_list() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [[wallets.solana]]
            name = "Phantom"
            address = "So1"

            [[wallets.solana]]
            name = "Backpack"
            address = "So2"
            outcome = "missing"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.wallets.solana.len(), 2);
        assert_eq!(cfg.wallets.solana[1].name, "Backpack");
        assert_eq!(cfg.wallets.solana[1].outcome, SimulatedOutcome::Missing);
        assert_eq!(cfg.wallets.evm[0].name, "MetaMask");
    }

    #[test]
    fn test_empty_adapter_list_falls_back() {
        let cfg: AppConfig = toml::from_str("[wallets]\nsolana = []\n").unwrap();
        assert_eq!(cfg.wallets.solana.len(), 2);
    }

    #[test]
    fn test_serializes_back() {
        let cfg = AppConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.wallets.solana.len(), 2);
        assert_eq!(back.wallets.solana[1].address, cfg.wallets.solana[1].address);
    }
}
