//! Deposit and borrow transaction sequences.
//!
//! Each flow is a small state machine owned by the screen that started it.
//! Steps that would wait on a chain are simulated by timer tasks; their
//! completions come back as events tagged with the flow id, and a flow only
//! accepts the completion for the step it is currently waiting on.

use crate::app::event::FlowId;
use crate::app::input::AmountInput;
use crate::finance::{self, Tier};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FlowError {
    #[error("enter an amount greater than 0 and at most {max}")]
    InvalidAmount { max: f64 },
    #[error("cannot {action} while {step}")]
    WrongStep { action: &'static str, step: &'static str },
}

/// Background step a flow is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStep {
    Approve,
    Deposit,
    Borrow,
}

impl PendingStep {
    pub fn label(self) -> &'static str {
        match self {
            PendingStep::Approve => "approve",
            PendingStep::Deposit => "deposit",
            PendingStep::Borrow => "borrow",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DepositStep {
    Input,
    Approving,
    Approved { approve_tx: String },
    Depositing { approve_tx: String },
    Success { approve_tx: String, deposit_tx: String },
}

impl DepositStep {
    pub fn name(&self) -> &'static str {
        match self {
            DepositStep::Input => "entering an amount",
            DepositStep::Approving => "approving",
            DepositStep::Approved { .. } => "approved",
            DepositStep::Depositing { .. } => "depositing",
            DepositStep::Success { .. } => "complete",
        }
    }
}

/// WETH deposit from the EVM side, credited on Solana.
#[derive(Debug)]
pub struct DepositFlow {
    pub id: FlowId,
    pub amount: AmountInput,
    pub wallet_balance: f64,
    pub step: DepositStep,
    preset: usize,
}

/// Preset fractions of the wallet balance, cycled with Tab.
pub const DEPOSIT_PRESETS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

impl DepositFlow {
    pub fn new(id: FlowId, wallet_balance: f64) -> Self {
        Self {
            id,
            amount: AmountInput::new(),
            wallet_balance,
            step: DepositStep::Input,
            preset: 0,
        }
    }

    pub fn parsed_amount(&self) -> Option<f64> {
        self.amount.value().filter(|v| *v > 0.0 && *v <= self.wallet_balance)
    }

    pub fn is_valid_amount(&self) -> bool {
        self.parsed_amount().is_some()
    }

    /// Fill the amount with the next preset fraction of the balance.
    pub fn cycle_preset(&mut self) {
        if self.step != DepositStep::Input {
            return;
        }
        let fraction = DEPOSIT_PRESETS[self.preset % DEPOSIT_PRESETS.len()];
        self.preset += 1;
        self.amount.set(self.wallet_balance * fraction);
    }

    pub fn begin_approve(&mut self) -> Result<PendingStep, FlowError> {
        if self.step != DepositStep::Input {
            return Err(self.wrong_step("approve"));
        }
        if !self.is_valid_amount() {
            return Err(FlowError::InvalidAmount { max: self.wallet_balance });
        }
        self.step = DepositStep::Approving;
        Ok(PendingStep::Approve)
    }

    pub fn begin_deposit(&mut self) -> Result<PendingStep, FlowError> {
        match &self.step {
            DepositStep::Approved { approve_tx } => {
                self.step = DepositStep::Depositing { approve_tx: approve_tx.clone() };
                Ok(PendingStep::Deposit)
            }
            _ => Err(self.wrong_step("deposit")),
        }
    }

    /// Apply the completion of a background step. Returns the deposited
    /// amount when the deposit itself has just confirmed.
    pub fn complete(&mut self, step: PendingStep, tx_hash: String) -> Result<Option<f64>, FlowError> {
        match (step, &self.step) {
            (PendingStep::Approve, DepositStep::Approving) => {
                self.step = DepositStep::Approved { approve_tx: tx_hash };
                Ok(None)
            }
            (PendingStep::Deposit, DepositStep::Depositing { approve_tx }) => {
                self.step = DepositStep::Success {
                    approve_tx: approve_tx.clone(),
                    deposit_tx: tx_hash,
                };
                Ok(self.amount.value())
            }
            _ => Err(self.wrong_step(step.label())),
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.step, DepositStep::Approving | DepositStep::Depositing { .. })
    }

    fn wrong_step(&self, action: &'static str) -> FlowError {
        FlowError::WrongStep { action, step: self.step.name() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BorrowStep {
    Input,
    Submitting,
    Submitted { tx: String },
}

impl BorrowStep {
    pub fn name(&self) -> &'static str {
        match self {
            BorrowStep::Input => "entering an amount",
            BorrowStep::Submitting => "submitting",
            BorrowStep::Submitted { .. } => "submitted",
        }
    }
}

/// Read-only figures for a borrow against the current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorrowQuote {
    pub amount: f64,
    pub user_ltv: f64,
    pub max_borrow_base: f64,
    pub max_borrow_user: f64,
    pub bonus_amount: f64,
    pub current_ltv: f64,
    pub liquidation_price: f64,
    pub health_factor: finance::HealthFactor,
}

impl BorrowQuote {
    pub fn new(amount: f64, collateral_value: f64, collateral_units: f64, tier: Tier) -> Self {
        let user_ltv = finance::effective_ltv(finance::BASE_LTV, tier);
        let max_borrow_base = finance::max_borrow(collateral_value, finance::BASE_LTV);
        let max_borrow_user = finance::max_borrow(collateral_value, user_ltv);
        Self {
            amount,
            user_ltv,
            max_borrow_base,
            max_borrow_user,
            bonus_amount: max_borrow_user - max_borrow_base,
            current_ltv: finance::current_ltv(amount, collateral_value),
            liquidation_price: finance::liquidation_price(amount, collateral_units),
            health_factor: finance::health_factor(collateral_value, amount),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.amount > 0.0 && self.amount <= self.max_borrow_user
    }
}

/// USDC borrow on Solana. Submission does not change the stored debt.
#[derive(Debug)]
pub struct BorrowFlow {
    pub id: FlowId,
    pub amount: AmountInput,
    pub step: BorrowStep,
}

impl BorrowFlow {
    pub fn new(id: FlowId) -> Self {
        Self {
            id,
            amount: AmountInput::new(),
            step: BorrowStep::Input,
        }
    }

    pub fn quote(&self, collateral_value: f64, collateral_units: f64, tier: Tier) -> BorrowQuote {
        BorrowQuote::new(self.amount.value().unwrap_or(0.0), collateral_value, collateral_units, tier)
    }

    pub fn begin_submit(&mut self, quote: &BorrowQuote) -> Result<PendingStep, FlowError> {
        if self.step != BorrowStep::Input {
            return Err(FlowError::WrongStep { action: "borrow", step: self.step.name() });
        }
        if !quote.is_allowed() {
            return Err(FlowError::InvalidAmount { max: quote.max_borrow_user });
        }
        self.step = BorrowStep::Submitting;
        Ok(PendingStep::Borrow)
    }

    pub fn complete(&mut self, step: PendingStep, tx_hash: String) -> Result<(), FlowError> {
        match (step, &self.step) {
            (PendingStep::Borrow, BorrowStep::Submitting) => {
                self.step = BorrowStep::Submitted { tx: tx_hash };
                Ok(())
            }
            _ => Err(FlowError::WrongStep { action: step.label(), step: self.step.name() }),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.step == BorrowStep::Submitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit_with(amount: &str) -> DepositFlow {
        let mut flow = DepositFlow::new(1, 15.5);
        for c in amount.chars() {
            flow.amount.insert_char(c);
        }
        flow
    }

    #[test]
    fn test_deposit_happy_path() {
        let mut flow = deposit_with("2.5");
        assert_eq!(flow.begin_approve(), Ok(PendingStep::Approve));
        assert!(flow.is_busy());
        assert_eq!(flow.complete(PendingStep::Approve, "0xaa".into()), Ok(None));
        assert_eq!(flow.step, DepositStep::Approved { approve_tx: "0xaa".into() });

        assert_eq!(flow.begin_deposit(), Ok(PendingStep::Deposit));
        assert_eq!(flow.complete(PendingStep::Deposit, "0xbb".into()), Ok(Some(2.5)));
        assert_eq!(
            flow.step,
            DepositStep::Success { approve_tx: "0xaa".into(), deposit_tx: "0xbb".into() }
        );
        assert!(!flow.is_busy());
    }

    #[test]
    fn test_deposit_rejects_invalid_amounts() {
        for bad in ["", "0", "16", "abc", "."] {
            let mut flow = deposit_with(bad);
            assert_eq!(flow.begin_approve(), Err(FlowError::InvalidAmount { max: 15.5 }), "{bad:?}");
            assert_eq!(flow.step, DepositStep::Input);
        }
        assert!(deposit_with("15.5").is_valid_amount());
    }

    #[test]
    fn test_deposit_ignores_out_of_order_completions() {
        let mut flow = deposit_with("1");
        assert!(flow.complete(PendingStep::Approve, "0x1".into()).is_err());
        assert!(flow.begin_deposit().is_err());

        flow.begin_approve().unwrap();
        assert!(flow.begin_approve().is_err());
        assert!(flow.complete(PendingStep::Deposit, "0x2".into()).is_err());
        assert_eq!(flow.step, DepositStep::Approving);
    }

    #[test]
    fn test_deposit_presets_cycle() {
        let mut flow = DepositFlow::new(1, 10.0);
        flow.cycle_preset();
        assert_eq!(flow.amount.value(), Some(2.5));
        flow.cycle_preset();
        assert_eq!(flow.amount.value(), Some(5.0));
        flow.cycle_preset();
        assert_eq!(flow.amount.value(), Some(7.5));
        flow.cycle_preset();
        assert_eq!(flow.amount.value(), Some(10.0));
        flow.cycle_preset();
        assert_eq!(flow.amount.value(), Some(2.5));
    }

    #[test]
    fn test_borrow_quote_gold() {
        let quote = BorrowQuote::new(15_000.0, 30_000.0, 10.0, Tier::Gold);
        assert_eq!(quote.user_ltv, 82.5);
        assert_eq!(quote.max_borrow_base, 22_500.0);
        assert_eq!(quote.current_ltv, 50.0);
        assert_eq!(quote.liquidation_price, 1_875.0);
        assert_eq!(quote.health_factor, finance::HealthFactor::Finite(1.6));
        assert!(quote.is_allowed());

        let zero = BorrowQuote::new(0.0, 30_000.0, 10.0, Tier::Gold);
        assert!(zero.health_factor.is_unbounded());
        assert!(!zero.is_allowed());
    }

    #[test]
    fn test_borrow_flow() {
        let mut flow = BorrowFlow::new(7);
        for c in "30000".chars() {
            flow.amount.insert_char(c);
        }
        let quote = flow.quote(30_000.0, 10.0, Tier::Platinum);
        assert!(matches!(flow.begin_submit(&quote), Err(FlowError::InvalidAmount { .. })));

        flow.amount.set(1000.0);
        let quote = flow.quote(30_000.0, 10.0, Tier::Platinum);
        assert_eq!(flow.begin_submit(&quote), Ok(PendingStep::Borrow));
        assert!(flow.is_busy());
        assert!(flow.complete(PendingStep::Approve, "0x1".into()).is_err());
        assert!(flow.complete(PendingStep::Borrow, "0x2".into()).is_ok());
        assert_eq!(flow.step, BorrowStep::Submitted { tx: "0x2".into() });
    }
}
