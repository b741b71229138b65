//! Wallet connection and balance refresh tasks.
//!
//! Provider calls run on spawned tasks and report back on the application
//! event channel. Every task is tied to a [`CancellationToken`] derived from
//! the manager's own token, so dropping the manager stops all of them.

use crate::app::event::AppEvent;
use crate::wallet::{ChainFamily, WalletError, WalletProvider};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct WalletManager {
    /// Adapters per chain, in registration order.
    providers: HashMap<ChainFamily, Vec<Arc<dyn WalletProvider>>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    pending: Arc<Mutex<HashSet<ChainFamily>>>,
    refreshers: HashMap<ChainFamily, CancellationToken>,
    shutdown: CancellationToken,
}

impl WalletManager {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            providers: HashMap::new(),
            event_tx,
            pending: Arc::new(Mutex::new(HashSet::new())),
            refreshers: HashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Add an adapter for its chain. Returns its index among that chain's
    /// adapters.
    pub fn register(&mut self, provider: Arc<dyn WalletProvider>) -> usize {
        let chain = provider.chain();
        let list = self.providers.entry(chain).or_default();
        tracing::info!(%chain, wallet = provider.name(), adapter = list.len(), "wallet provider registered");
        list.push(provider);
        list.len() - 1
    }

    fn provider(&self, chain: ChainFamily, adapter: usize) -> Option<Arc<dyn WalletProvider>> {
        self.providers.get(&chain).and_then(|list| list.get(adapter)).cloned()
    }

    pub fn is_connecting(&self, chain: ChainFamily) -> bool {
        self.pending.lock().map(|p| p.contains(&chain)).unwrap_or(false)
    }

    /// Start a connection attempt through adapter `adapter` of `chain`. The
    /// outcome arrives as [`AppEvent::WalletConnected`] or
    /// [`AppEvent::WalletConnectFailed`]. One attempt per chain at a time.
    pub fn connect(&self, chain: ChainFamily, adapter: usize) -> Result<(), WalletError> {
        let provider = self.provider(chain, adapter).ok_or(WalletError::NotInstalled)?;

        {
            let mut pending = self
                .pending
                .lock()
                .map_err(|_| WalletError::Unknown("wallet state poisoned".into()))?;
            if !pending.insert(chain) {
                return Err(WalletError::RequestPending);
            }
        }

        tracing::info!(%chain, wallet = provider.name(), adapter, "connecting wallet");
        let pending = Arc::clone(&self.pending);
        let event_tx = self.event_tx.clone();
        let token = self.shutdown.child_token();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => None,
                r = provider.connect() => Some(r),
            };
            if let Ok(mut p) = pending.lock() {
                p.remove(&chain);
            }
            let event = match result {
                Some(Ok(account)) => AppEvent::WalletConnected { chain, adapter, account },
                Some(Err(error)) => {
                    tracing::warn!(%chain, adapter, %error, "wallet connection failed");
                    AppEvent::WalletConnectFailed { chain, adapter, error }
                }
                None => return,
            };
            let _ = event_tx.send(event);
        });
        Ok(())
    }

    /// (Re)start the periodic balance refresh for `chain`, reading through
    /// the adapter that connected. Any previous refresh task for the chain
    /// is cancelled first.
    pub fn start_refresh(&mut self, chain: ChainFamily, adapter: usize, address: String, period: Duration) -> bool {
        let Some(provider) = self.provider(chain, adapter) else {
            return false;
        };
        self.stop_refresh(chain);

        let token = self.shutdown.child_token();
        self.refreshers.insert(chain, token.clone());
        let event_tx = self.event_tx.clone();
        let period = period.max(Duration::from_millis(10));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately; the connect already read the balance.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                let event = match provider.get_balance(&address).await {
                    Ok(balance) => {
                        tracing::debug!(%chain, balance, "balance refreshed");
                        AppEvent::BalanceRefreshed { chain, balance }
                    }
                    Err(error) => {
                        tracing::warn!(%chain, %error, "balance refresh failed");
                        AppEvent::BalanceRefreshFailed { chain, error }
                    }
                };
                if token.is_cancelled() || event_tx.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!(%chain, "balance refresh stopped");
        });
        true
    }

    pub fn stop_refresh(&mut self, chain: ChainFamily) {
        if let Some(token) = self.refreshers.remove(&chain) {
            token.cancel();
        }
    }

    #[cfg(test)]
    pub fn is_refreshing(&self, chain: ChainFamily) -> bool {
        self.refreshers.contains_key(&chain)
    }

    /// Cancel every task started by this manager.
    pub fn shutdown(&mut self) {
        self.refreshers.clear();
        self.shutdown.cancel();
    }
}

impl Drop for WalletManager {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
