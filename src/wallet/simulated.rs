use super::{ChainFamily, WalletError, WalletProvider};
use crate::config::{SimulatedOutcome, WalletConfig};
use async_trait::async_trait;
use std::time::Duration;

/// Wallet that answers from configuration after a fixed delay.
pub struct SimulatedProvider {
    chain: ChainFamily,
    name: String,
    address: Option<String>,
    balance: f64,
    latency: Duration,
    outcome: SimulatedOutcome,
}

impl SimulatedProvider {
    pub fn new(chain: ChainFamily, name: &str, address: Option<&str>, balance: f64) -> Self {
        Self {
            chain,
            name: name.to_string(),
            address: address.map(str::to_string),
            balance,
            latency: Duration::ZERO,
            outcome: SimulatedOutcome::Approve,
        }
    }

    pub fn from_config(chain: ChainFamily, config: &WalletConfig) -> Self {
        Self {
            chain,
            name: config.name.clone(),
            address: config.address.clone(),
            balance: config.balance,
            latency: Duration::from_millis(config.latency_ms),
            outcome: config.outcome,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_outcome(mut self, outcome: SimulatedOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

#[async_trait]
impl WalletProvider for SimulatedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn chain(&self) -> ChainFamily {
        self.chain
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        if self.outcome == SimulatedOutcome::Missing {
            return Err(WalletError::NotInstalled);
        }
        tokio::time::sleep(self.latency).await;
        match self.outcome {
            SimulatedOutcome::Approve => Ok(self.address.iter().cloned().collect()),
            SimulatedOutcome::Reject => Err(WalletError::UserRejected),
            SimulatedOutcome::Pending => Err(WalletError::RequestPending),
            SimulatedOutcome::Missing => Err(WalletError::NotInstalled),
        }
    }

    async fn get_balance(&self, address: &str) -> Result<f64, WalletError> {
        if self.outcome == SimulatedOutcome::Missing {
            return Err(WalletError::NotInstalled);
        }
        if self.address.as_deref() != Some(address) {
            return Err(WalletError::Unknown(format!("unknown account {}", address)));
        }
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_approved() {
        let provider = SimulatedProvider::new(ChainFamily::Solana, "Phantom", Some("So1"), 12.5);
        let account = provider.connect().await.unwrap();
        assert_eq!(account.address, "So1");
        assert_eq!(account.balance, 12.5);
    }

    #[tokio::test]
    async fn test_outcomes_are_classified() {
        let base = || SimulatedProvider::new(ChainFamily::Evm, "MetaMask", Some("0xabc"), 0.8);
        assert_eq!(
            base().with_outcome(SimulatedOutcome::Reject).connect().await,
            Err(WalletError::UserRejected)
        );
        assert_eq!(
            base().with_outcome(SimulatedOutcome::Pending).connect().await,
            Err(WalletError::RequestPending)
        );
        assert_eq!(
            base().with_outcome(SimulatedOutcome::Missing).connect().await,
            Err(WalletError::NotInstalled)
        );
    }

    #[tokio::test]
    async fn test_no_accounts() {
        let provider = SimulatedProvider::new(ChainFamily::Evm, "MetaMask", None, 0.0);
        assert!(matches!(provider.connect().await, Err(WalletError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let provider = SimulatedProvider::new(ChainFamily::Solana, "Phantom", Some("So1"), 1.0)
            .with_latency(Duration::from_millis(30));
        let start = tokio::time::Instant::now();
        provider.request_accounts().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
