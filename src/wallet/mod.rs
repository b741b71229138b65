//! Chain wallet capability layer.
//!
//! Each supported chain family is reached through a [`WalletProvider`]. The
//! rest of the application never probes for a wallet: an absent or
//! unreachable provider surfaces as a typed [`WalletError`].

pub mod manager;
pub mod rpc;
pub mod simulated;

pub use manager::WalletManager;
pub use rpc::RpcProvider;
pub use simulated::SimulatedProvider;

use crate::config::{ProviderKind, WalletConfig};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    Solana,
    Evm,
}

impl ChainFamily {
    pub const ALL: [ChainFamily; 2] = [ChainFamily::Solana, ChainFamily::Evm];

    /// Ticker of the native asset.
    pub fn native_symbol(self) -> &'static str {
        match self {
            ChainFamily::Solana => "SOL",
            ChainFamily::Evm => "ETH",
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            ChainFamily::Solana => "https://api.devnet.solana.com",
            ChainFamily::Evm => "https://rpc.sepolia.org",
        }
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFamily::Solana => f.write_str("Solana"),
            ChainFamily::Evm => f.write_str("EVM"),
        }
    }
}

/// Classified wallet failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet is not installed")]
    NotInstalled,
    #[error("request rejected by user")]
    UserRejected,
    #[error("a connection request is already pending")]
    RequestPending,
    #[error("{0}")]
    Unknown(String),
}

impl WalletError {
    /// Classify an EIP-1193 style provider error code.
    pub fn from_rpc_code(code: i64, message: &str) -> Self {
        match code {
            4001 => WalletError::UserRejected,
            -32002 => WalletError::RequestPending,
            _ => WalletError::Unknown(format!("{} (code {})", message, code)),
        }
    }

    /// Message shown to the user for a failed connection attempt.
    pub fn user_message(&self, wallet: &str) -> String {
        match self {
            WalletError::NotInstalled => format!(
                "{} is not installed or not detected. Install it and try again.",
                wallet
            ),
            WalletError::UserRejected => format!(
                "Connection rejected by user. Approve the connection in {} to continue.",
                wallet
            ),
            WalletError::RequestPending => format!(
                "Connection request is already pending. Check {} and approve the connection.",
                wallet
            ),
            WalletError::Unknown(detail) => format!(
                "Failed to connect to {}: {}. Make sure it is unlocked and try again.",
                wallet, detail
            ),
        }
    }
}

/// An account returned by a successful connection.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletAccount {
    pub address: String,
    pub balance: f64,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Wallet label (e.g. "Phantom").
    fn name(&self) -> &str;

    fn chain(&self) -> ChainFamily;

    /// Ask the wallet for its accounts; the first one is used.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Native balance of `address`, in whole units (SOL, ETH).
    async fn get_balance(&self, address: &str) -> Result<f64, WalletError>;

    /// Request an account and read its balance. A failed balance read does
    /// not fail the connection; the account comes back with a zero balance.
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        let accounts = self.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::Unknown("no accounts found".into()))?;
        let balance = match self.get_balance(&address).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(wallet = self.name(), error = %e, "balance read failed during connect");
                0.0
            }
        };
        Ok(WalletAccount { address, balance })
    }
}

/// Build the provider described by `config` for `chain`.
pub fn build_provider(chain: ChainFamily, config: &WalletConfig) -> Arc<dyn WalletProvider> {
    match config.provider {
        ProviderKind::Simulated => Arc::new(SimulatedProvider::from_config(chain, config)),
        ProviderKind::Rpc => Arc::new(RpcProvider::from_config(chain, config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_code_classification() {
        assert_eq!(WalletError::from_rpc_code(4001, "denied"), WalletError::UserRejected);
        assert_eq!(WalletError::from_rpc_code(-32002, "busy"), WalletError::RequestPending);
        assert!(matches!(
            WalletError::from_rpc_code(-32603, "internal"),
            WalletError::Unknown(ref m) if m.contains("-32603")
        ));
    }

    #[test]
    fn test_user_messages_name_the_wallet() {
        let msg = WalletError::NotInstalled.user_message("MetaMask");
        assert!(msg.starts_with("MetaMask is not installed"));
        assert!(WalletError::UserRejected.user_message("Phantom").contains("Phantom"));
    }
}
