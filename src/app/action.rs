use crate::app::event::FlowId;
use crate::app::flow::PendingStep;
use crate::wallet::ChainFamily;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `adapter` indexes the chain's configured wallets.
    ConnectWallet { chain: ChainFamily, adapter: usize },
    StartBalanceRefresh { chain: ChainFamily, adapter: usize, address: String },
    MintIdentity,
    ScheduleFlowStep { flow_id: FlowId, step: PendingStep },
    CancelFlow { flow_id: FlowId },
    Quit,
}
