//! Application state store.
//!
//! [`Store`] owns the one [`ProtocolState`] record of the session. All
//! mutation goes through the named operations below; each one merges a
//! [`StateUpdate`] into the record, re-derives dependent fields, and pushes a
//! [`Notification`] to every subscriber before returning.
//!
//! Subscribers receive notifications over an unbounded channel, so a
//! subscriber that reacts to a notification by mutating the store just queues
//! another notification instead of re-entering the broadcast.

use crate::finance::{self, HealthFactor, Tier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

pub type SubscriberId = u64;

/// Screen selected after onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Deposit,
    Borrow,
}

impl View {
    /// Parse a view name. Unknown names fall back to the dashboard.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "deposit" => View::Deposit,
            "borrow" => View::Borrow,
            _ => View::Dashboard,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Deposit => "deposit",
            View::Borrow => "borrow",
        }
    }
}

/// A deposited holding backing the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralAsset {
    pub symbol: String,
    pub name: String,
    pub chain: String,
    pub amount: f64,
    /// USD value.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolState {
    pub solana_wallet: Option<String>,
    pub evm_wallet: Option<String>,
    pub is_wallet_connected: bool,
    pub solana_balance: f64,
    pub evm_balance: f64,
    pub has_user_profile: bool,
    pub trust_score: u32,
    pub tier: Tier,
    pub collateral_assets: Vec<CollateralAsset>,
    pub total_collateral: f64,
    pub total_debt: f64,
    pub net_value: f64,
    pub health_factor: HealthFactor,
    pub current_view: View,
    pub is_loading: bool,
}

impl Default for ProtocolState {
    fn default() -> Self {
        Self::with_position(
            750,
            vec![CollateralAsset {
                symbol: "WETH".into(),
                name: "Wrapped Ether".into(),
                chain: "Sepolia".into(),
                amount: 10.0,
                value: 30_000.0,
            }],
            5_000.0,
        )
    }
}

impl ProtocolState {
    /// Fresh, disconnected session state seeded with a position.
    pub fn with_position(trust_score: u32, collateral_assets: Vec<CollateralAsset>, total_debt: f64) -> Self {
        let total_debt = non_negative(total_debt);
        let mut state = Self {
            solana_wallet: None,
            evm_wallet: None,
            is_wallet_connected: false,
            solana_balance: 0.0,
            evm_balance: 0.0,
            has_user_profile: false,
            trust_score,
            tier: Tier::from_score(trust_score),
            collateral_assets,
            total_collateral: 0.0,
            total_debt,
            net_value: 0.0,
            health_factor: HealthFactor::Unbounded,
            current_view: View::Dashboard,
            is_loading: false,
        };
        state.recompute_position();
        state
    }

    /// No collateral, no debt.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self::with_position(0, Vec::new(), 0.0)
    }

    /// Sum of collateral asset amounts, used as the unit count for the
    /// liquidation price estimate.
    pub fn collateral_units(&self) -> f64 {
        self.collateral_assets.iter().map(|a| a.amount).sum()
    }

    fn recompute_position(&mut self) {
        self.total_collateral = self.collateral_assets.iter().map(|a| a.value).sum();
        self.net_value = self.total_collateral - self.total_debt;
        self.health_factor = finance::health_factor(self.total_collateral, self.total_debt);
    }

    fn merge(&mut self, update: StateUpdate) {
        if let Some(addr) = update.solana_wallet {
            self.solana_wallet = Some(addr);
        }
        if let Some(addr) = update.evm_wallet {
            self.evm_wallet = Some(addr);
        }
        if let Some(bal) = update.solana_balance {
            self.solana_balance = non_negative(bal);
        }
        if let Some(bal) = update.evm_balance {
            self.evm_balance = non_negative(bal);
        }
        if update.has_user_profile == Some(true) {
            self.has_user_profile = true;
        }
        if let Some(view) = update.current_view {
            self.current_view = view;
        }
        if let Some(loading) = update.is_loading {
            self.is_loading = loading;
        }
        if let Some(asset) = update.add_collateral {
            self.collateral_assets.push(asset);
            self.recompute_position();
        }

        self.is_wallet_connected = self.solana_wallet.is_some() && self.evm_wallet.is_some();
        self.tier = Tier::from_score(self.trust_score);
    }
}

/// Partial update merged into [`ProtocolState`]. `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct StateUpdate {
    pub solana_wallet: Option<String>,
    pub evm_wallet: Option<String>,
    pub solana_balance: Option<f64>,
    pub evm_balance: Option<f64>,
    pub has_user_profile: Option<bool>,
    pub current_view: Option<View>,
    pub is_loading: Option<bool>,
    pub add_collateral: Option<CollateralAsset>,
}

/// Delivered to every subscriber after each change.
#[derive(Debug, Clone)]
pub struct Notification {
    pub revision: u64,
    pub snapshot: Arc<ProtocolState>,
}

/// Receiving end of a store subscription.
pub struct Subscription {
    pub id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl Subscription {
    /// Next queued notification, if any.
    pub fn try_next(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Drain everything queued and return the newest notification.
    pub fn latest(&mut self) -> Option<Notification> {
        let mut newest = None;
        while let Some(n) = self.try_next() {
            newest = Some(n);
        }
        newest
    }
}

struct Subscriber {
    id: SubscriberId,
    tx: mpsc::UnboundedSender<Notification>,
}

pub struct Store {
    state: ProtocolState,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: SubscriberId,
    revision: u64,
}

impl Store {
    pub fn new(state: ProtocolState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_subscriber_id: 0,
            revision: 0,
        }
    }

    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    #[cfg(test)]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_subscriber_id;
        self.next_subscriber_id += 1;
        self.subscribers.push(Subscriber { id, tx });
        Subscription { id, rx }
    }

    /// Remove a subscriber. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn connect_solana_wallet(&mut self, address: &str, balance: f64) {
        if self.state.solana_wallet.as_deref() == Some(address) {
            return;
        }
        tracing::info!(address, balance, "solana wallet connected");
        self.apply(StateUpdate {
            solana_wallet: Some(address.to_string()),
            solana_balance: Some(balance),
            ..Default::default()
        });
    }

    pub fn connect_evm_wallet(&mut self, address: &str, balance: f64) {
        if self.state.evm_wallet.as_deref() == Some(address) {
            return;
        }
        tracing::info!(address, balance, "evm wallet connected");
        self.apply(StateUpdate {
            evm_wallet: Some(address.to_string()),
            evm_balance: Some(balance),
            ..Default::default()
        });
    }

    pub fn update_balances(&mut self, solana_balance: f64, evm_balance: Option<f64>) {
        self.apply(StateUpdate {
            solana_balance: Some(solana_balance),
            evm_balance,
            ..Default::default()
        });
    }

    pub fn update_evm_balance(&mut self, evm_balance: f64) {
        self.apply(StateUpdate {
            evm_balance: Some(evm_balance),
            ..Default::default()
        });
    }

    pub fn create_user_profile(&mut self) {
        tracing::info!("user profile created");
        self.apply(StateUpdate {
            has_user_profile: Some(true),
            is_loading: Some(false),
            ..Default::default()
        });
    }

    pub fn set_current_view(&mut self, view: View) {
        tracing::debug!(view = view.name(), "view selected");
        self.apply(StateUpdate {
            current_view: Some(view),
            ..Default::default()
        });
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.apply(StateUpdate {
            is_loading: Some(loading),
            ..Default::default()
        });
    }

    pub fn add_collateral(&mut self, asset: CollateralAsset) {
        tracing::info!(symbol = %asset.symbol, value = asset.value, "collateral added");
        self.apply(StateUpdate {
            add_collateral: Some(asset),
            ..Default::default()
        });
    }

    fn apply(&mut self, update: StateUpdate) {
        self.state.merge(update);
        self.revision += 1;
        self.notify();
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let note = Notification {
            revision: self.revision,
            snapshot: Arc::new(self.state.clone()),
        };
        // Closed receivers are dropped from the set here.
        self.subscribers.retain(|s| s.tx.send(note.clone()).is_ok());
        tracing::debug!(revision = self.revision, subscribers = self.subscribers.len(), "store notified");
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
