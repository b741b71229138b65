use crate::app::flow::PendingStep;
use crate::wallet::{ChainFamily, WalletAccount, WalletError};
use crossterm::event::Event as CrosstermEvent;

pub type FlowId = u64;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// Wallet connection attempt finished
    WalletConnected {
        chain: ChainFamily,
        adapter: usize,
        account: WalletAccount,
    },
    WalletConnectFailed {
        chain: ChainFamily,
        adapter: usize,
        error: WalletError,
    },

    /// Periodic balance refresh results
    BalanceRefreshed {
        chain: ChainFamily,
        balance: f64,
    },
    BalanceRefreshFailed {
        chain: ChainFamily,
        error: WalletError,
    },

    /// Simulated identity mint confirmed
    IdentityMinted,

    /// Simulated transaction step confirmed
    FlowStepCompleted {
        flow_id: FlowId,
        step: PendingStep,
        tx_hash: String,
    },

    /// Tick for UI refresh
    Tick,
}
