use crate::app::event::FlowId;
use crate::app::flow::{BorrowFlow, DepositFlow};
use crate::app::router::{self, Screen};
use crate::app::store::{ProtocolState, Store, View};
use crate::config::{AppConfig, WalletConfig};
use crate::wallet::ChainFamily;
use chrono::{DateTime, Local};
use std::collections::{HashMap, VecDeque};

const MAX_NOTICES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One line of feedback for the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
    pub at: DateTime<Local>,
    pub text: String,
    pub kind: NoticeKind,
}

/// Wallet picker shown over the landing screen.
#[derive(Debug, Default)]
pub struct ConnectModal {
    pub visible: bool,
    /// Adapter index being connected, per chain.
    pub connecting: HashMap<ChainFamily, usize>,
}

#[derive(Debug, Default)]
pub struct OnboardingState {
    pub agreed_to_terms: bool,
}

pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub connect_modal: ConnectModal,
    pub onboarding: OnboardingState,
    pub deposit: Option<DepositFlow>,
    pub borrow: Option<BorrowFlow>,
    pub notices: VecDeque<Notice>,
    /// Adapter that supplied each connected wallet.
    pub connected_adapter: HashMap<ChainFamily, usize>,
    pub next_flow_id: FlowId,
    pub tick_count: u64,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let position = &config.position;
        let mut protocol = ProtocolState::with_position(
            position.trust_score,
            position.collateral.clone(),
            position.total_debt,
        );
        protocol.current_view = View::from_name(&config.ui.start_view);
        Self {
            config,
            store: Store::new(protocol),
            connect_modal: ConnectModal::default(),
            onboarding: OnboardingState::default(),
            deposit: None,
            borrow: None,
            notices: VecDeque::new(),
            connected_adapter: HashMap::new(),
            next_flow_id: 1,
            tick_count: 0,
            should_quit: false,
            dirty: true,
        }
    }

    pub fn protocol(&self) -> &ProtocolState {
        self.store.state()
    }

    pub fn screen(&self) -> Screen {
        router::route(self.store.state())
    }

    pub fn allocate_flow_id(&mut self) -> FlowId {
        let id = self.next_flow_id;
        self.next_flow_id += 1;
        id
    }

    pub fn adapters(&self, chain: ChainFamily) -> &[WalletConfig] {
        match chain {
            ChainFamily::Solana => &self.config.wallets.solana,
            ChainFamily::Evm => &self.config.wallets.evm,
        }
    }

    pub fn adapter_name(&self, chain: ChainFamily, adapter: usize) -> &str {
        self.adapters(chain)
            .get(adapter)
            .map(|w| w.name.as_str())
            .unwrap_or("wallet")
    }

    /// Name of the connected adapter, or the chain's first adapter.
    pub fn wallet_name(&self, chain: ChainFamily) -> &str {
        let adapter = self.connected_adapter.get(&chain).copied().unwrap_or(0);
        self.adapter_name(chain, adapter)
    }

    /// Every adapter the connect modal offers, Solana first. Entry `n`
    /// is selected with digit key `n + 1`.
    pub fn modal_entries(&self) -> Vec<(ChainFamily, usize)> {
        ChainFamily::ALL
            .into_iter()
            .flat_map(|chain| (0..self.adapters(chain).len()).map(move |i| (chain, i)))
            .collect()
    }

    pub fn wallet_address(&self, chain: ChainFamily) -> Option<&str> {
        let state = self.store.state();
        match chain {
            ChainFamily::Solana => state.solana_wallet.as_deref(),
            ChainFamily::Evm => state.evm_wallet.as_deref(),
        }
    }

    pub fn wallet_balance(&self, chain: ChainFamily) -> f64 {
        let state = self.store.state();
        match chain {
            ChainFamily::Solana => state.solana_balance,
            ChainFamily::Evm => state.evm_balance,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push_notice(text.into(), NoticeKind::Info);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push_notice(text.into(), NoticeKind::Error);
    }

    fn push_notice(&mut self, text: String, kind: NoticeKind) {
        self.notices.push_back(Notice {
            at: Local::now(),
            text,
            kind,
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
        self.dirty = true;
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    /// True while something on screen is animating.
    pub fn is_busy(&self) -> bool {
        self.store.state().is_loading
            || !self.connect_modal.connecting.is_empty()
            || self.deposit.as_ref().is_some_and(|f| f.is_busy())
            || self.borrow.as_ref().is_some_and(|f| f.is_busy())
    }

    pub fn status_line(&self) -> String {
        let state = self.store.state();
        let mut parts = Vec::new();
        for chain in ChainFamily::ALL {
            let label = match self.wallet_address(chain) {
                Some(addr) => format!(
                    "{} {} {:.4} {}",
                    chain,
                    short_address(addr),
                    self.wallet_balance(chain),
                    chain.native_symbol()
                ),
                None => format!("{} not connected", chain),
            };
            parts.push(label);
        }
        if state.has_user_profile {
            parts.push(format!("{} {}", state.tier, state.trust_score));
        }
        parts.join(" | ")
    }
}

/// `7xKX...sAsU` style abbreviation.
pub fn short_address(addr: &str) -> String {
    if addr.chars().count() <= 10 {
        return addr.to_string();
    }
    let head: String = addr.chars().take(4).collect();
    let tail: String = addr.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seeds_store_from_config() {
        let mut config = AppConfig::default();
        config.position.trust_score = 1200;
        config.ui.start_view = "borrow".into();
        let state = AppState::new(config);
        assert_eq!(state.protocol().tier, crate::finance::Tier::Platinum);
        assert_eq!(state.protocol().current_view, View::Borrow);
        assert_eq!(state.screen(), Screen::Connect);
    }

    #[test]
    fn test_notices_are_bounded() {
        let mut state = AppState::new(AppConfig::default());
        for i in 0..30 {
            state.info(format!("n{}", i));
        }
        assert_eq!(state.notices.len(), MAX_NOTICES);
        assert_eq!(state.latest_notice().map(|n| n.text.as_str()), Some("n29"));
    }

    #[test]
    fn test_modal_lists_every_adapter() {
        let mut state = AppState::new(AppConfig::default());
        assert_eq!(
            state.modal_entries(),
            vec![(ChainFamily::Solana, 0), (ChainFamily::Solana, 1), (ChainFamily::Evm, 0)]
        );
        assert_eq!(state.wallet_name(ChainFamily::Solana), "Phantom");
        state.connected_adapter.insert(ChainFamily::Solana, 1);
        assert_eq!(state.wallet_name(ChainFamily::Solana), "Solflare");
        assert_eq!(state.adapter_name(ChainFamily::Evm, 5), "wallet");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"), "7xKX...gAsU");
        assert_eq!(short_address("0xabc"), "0xabc");
    }
}
