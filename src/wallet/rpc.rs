//! Watch-only wallet backed by a JSON-RPC node.
//!
//! The terminal has no signing wallet to talk to, so the account is the
//! address from configuration. Only balance reads touch the network:
//! `getBalance` (lamports) on Solana, `eth_getBalance` (hex wei) on EVM chains.

use super::{ChainFamily, WalletError, WalletProvider};
use crate::config::WalletConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;
const WEI_PER_ETH: f64 = 1e18;

pub struct RpcProvider {
    chain: ChainFamily,
    name: String,
    address: Option<String>,
    url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    #[serde(default)]
    message: String,
}

impl RpcProvider {
    pub fn from_config(chain: ChainFamily, config: &WalletConfig) -> Self {
        let url = config
            .rpc_url
            .clone()
            .unwrap_or_else(|| chain.default_rpc_url().to_string());
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            chain,
            name: config.name.clone(),
            address: config.address.clone(),
            url,
            client,
        }
    }

    fn balance_request(&self, address: &str) -> Value {
        match self.chain {
            ChainFamily::Solana => json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getBalance",
                "params": [address],
            }),
            ChainFamily::Evm => json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_getBalance",
                "params": [address, "latest"],
            }),
        }
    }
}

#[async_trait]
impl WalletProvider for RpcProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn chain(&self) -> ChainFamily {
        self.chain
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        match &self.address {
            Some(addr) if !addr.trim().is_empty() => Ok(vec![addr.trim().to_string()]),
            _ => Err(WalletError::NotInstalled),
        }
    }

    async fn get_balance(&self, address: &str) -> Result<f64, WalletError> {
        let body = self.balance_request(address);
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Unknown(format!("RPC request to {} failed: {}", self.url, e)))?;
        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| WalletError::Unknown(format!("invalid RPC response: {}", e)))?;
        let result = unwrap_response(parsed)?;
        match self.chain {
            ChainFamily::Solana => parse_lamports(&result),
            ChainFamily::Evm => parse_wei(&result),
        }
    }
}

fn unwrap_response(response: RpcResponse) -> Result<Value, WalletError> {
    if let Some(err) = response.error {
        return Err(WalletError::from_rpc_code(err.code, &err.message));
    }
    response
        .result
        .ok_or_else(|| WalletError::Unknown("RPC response has no result".into()))
}

/// Solana `getBalance` result: `{ "context": {..}, "value": <lamports> }`.
fn parse_lamports(result: &Value) -> Result<f64, WalletError> {
    let lamports = result
        .get("value")
        .and_then(Value::as_u64)
        .ok_or_else(|| WalletError::Unknown(format!("unexpected getBalance result: {}", result)))?;
    Ok(lamports as f64 / LAMPORTS_PER_SOL)
}

/// EVM `eth_getBalance` result: hex quantity in wei.
fn parse_wei(result: &Value) -> Result<f64, WalletError> {
    let hex = result
        .as_str()
        .and_then(|s| s.strip_prefix("0x"))
        .ok_or_else(|| WalletError::Unknown(format!("unexpected eth_getBalance result: {}", result)))?;
    if hex.is_empty() {
        return Ok(0.0);
    }
    let wei = u128::from_str_radix(hex, 16)
        .map_err(|e| WalletError::Unknown(format!("bad wei quantity {}: {}", hex, e)))?;
    Ok(wei as f64 / WEI_PER_ETH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderKind, SimulatedOutcome};

    fn config(address: Option<&str>) -> WalletConfig {
        WalletConfig {
            provider: ProviderKind::Rpc,
            name: "MetaMask".into(),
            address: address.map(str::to_string),
            balance: 0.0,
            latency_ms: 0,
            outcome: SimulatedOutcome::Approve,
            rpc_url: None,
        }
    }

    #[test]
    fn test_parse_lamports() {
        let result = json!({ "context": { "slot": 1 }, "value": 12_500_000_000u64 });
        assert_eq!(parse_lamports(&result), Ok(12.5));
        assert!(parse_lamports(&json!({ "value": "x" })).is_err());
    }

    #[test]
    fn test_parse_wei() {
        // 0.05 ETH
        assert_eq!(parse_wei(&json!("0xb1a2bc2ec50000")), Ok(0.05));
        assert_eq!(parse_wei(&json!("0x0")), Ok(0.0));
        assert_eq!(parse_wei(&json!("0x")), Ok(0.0));
        assert!(parse_wei(&json!(12)).is_err());
        assert!(parse_wei(&json!("0xzz")).is_err());
    }

    #[test]
    fn test_error_body_is_classified() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 4001, "message": "User rejected the request." }
        }))
        .unwrap();
        assert_eq!(unwrap_response(response), Err(WalletError::UserRejected));

        let empty: RpcResponse = serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1 })).unwrap();
        assert!(matches!(unwrap_response(empty), Err(WalletError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_request_accounts_uses_configured_address() {
        let provider = RpcProvider::from_config(ChainFamily::Evm, &config(Some("0xabc")));
        assert_eq!(provider.request_accounts().await, Ok(vec!["0xabc".to_string()]));
        assert_eq!(provider.url, "https://rpc.sepolia.org");

        let missing = RpcProvider::from_config(ChainFamily::Evm, &config(None));
        assert_eq!(missing.request_accounts().await, Err(WalletError::NotInstalled));
    }

    #[test]
    fn test_balance_request_shape() {
        let provider = RpcProvider::from_config(ChainFamily::Solana, &config(Some("So1")));
        let body = provider.balance_request("So1");
        assert_eq!(body["method"], "getBalance");
        assert_eq!(body["params"][0], "So1");
    }
}
