use crate::app::action::Action;
use crate::app::event::{AppEvent, FlowId};
use crate::app::flow::{BorrowFlow, BorrowStep, DepositFlow, DepositStep, PendingStep};
use crate::app::input::AmountInput;
use crate::app::router::Screen;
use crate::app::state::*;
use crate::app::store::{CollateralAsset, View};
use crate::app::timers::short_hash;
use crate::wallet::{ChainFamily, WalletAccount, WalletError};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    let mut actions = match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::WalletConnected { chain, adapter, account } => {
            handle_wallet_connected(state, chain, adapter, account)
        }
        AppEvent::WalletConnectFailed { chain, adapter, error } => {
            connect_failed(state, chain, adapter, error);
            vec![]
        }
        AppEvent::BalanceRefreshed { chain, balance } => {
            match chain {
                ChainFamily::Solana => state.store.update_balances(balance, None),
                ChainFamily::Evm => state.store.update_evm_balance(balance),
            }
            vec![]
        }
        AppEvent::BalanceRefreshFailed { chain, error } => {
            // The last known balance stays on screen.
            state.error(format!("{} balance refresh failed: {}", chain, error));
            vec![]
        }
        AppEvent::IdentityMinted => {
            state.store.create_user_profile();
            let view = View::from_name(&state.config.ui.start_view);
            state.store.set_current_view(view);
            state.info("Trust identity minted");
            vec![]
        }
        AppEvent::FlowStepCompleted { flow_id, step, tx_hash } => {
            handle_flow_step(state, flow_id, step, tx_hash);
            vec![]
        }
        AppEvent::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            if state.is_busy() {
                state.dirty = true;
            }
            vec![]
        }
    };
    actions.extend(sync_flows(state));
    actions
}

/// Record a failed connection attempt through `adapter` of `chain`.
pub fn connect_failed(state: &mut AppState, chain: ChainFamily, adapter: usize, error: WalletError) {
    state.connect_modal.connecting.remove(&chain);
    let message = error.user_message(state.adapter_name(chain, adapter));
    state.error(message);
}

fn handle_wallet_connected(
    state: &mut AppState,
    chain: ChainFamily,
    adapter: usize,
    account: WalletAccount,
) -> Vec<Action> {
    state.connect_modal.connecting.remove(&chain);
    state.connected_adapter.insert(chain, adapter);
    let WalletAccount { address, balance } = account;
    match chain {
        ChainFamily::Solana => state.store.connect_solana_wallet(&address, balance),
        ChainFamily::Evm => state.store.connect_evm_wallet(&address, balance),
    }
    let name = state.wallet_name(chain).to_string();
    state.info(format!("{} connected: {}", name, short_address(&address)));
    if state.protocol().is_wallet_connected {
        state.connect_modal.visible = false;
    }
    vec![Action::StartBalanceRefresh { chain, adapter, address }]
}

fn handle_flow_step(state: &mut AppState, flow_id: FlowId, step: PendingStep, tx_hash: String) {
    if let Some(flow) = state.deposit.as_mut().filter(|f| f.id == flow_id) {
        let hash = short_hash(&tx_hash);
        match flow.complete(step, tx_hash) {
            Ok(Some(amount)) => {
                let price = state.config.position.weth_price_usd;
                state.store.set_loading(false);
                state.store.add_collateral(CollateralAsset {
                    symbol: "WETH".into(),
                    name: "Wrapped Ether".into(),
                    chain: "Sepolia".into(),
                    amount,
                    value: amount * price,
                });
                state.info(format!("Deposited {} WETH ({})", amount, hash));
            }
            Ok(None) => {
                state.store.set_loading(false);
                state.info(format!("WETH spend approved ({})", hash));
            }
            Err(e) => tracing::warn!(flow_id, error = %e, "deposit completion ignored"),
        }
        return;
    }

    if let Some(flow) = state.borrow.as_mut().filter(|f| f.id == flow_id) {
        let hash = short_hash(&tx_hash);
        match flow.complete(step, tx_hash) {
            Ok(()) => {
                state.store.set_loading(false);
                state.info(format!("Borrow transaction submitted to Solana ({})", hash));
            }
            Err(e) => tracing::warn!(flow_id, error = %e, "borrow completion ignored"),
        }
        return;
    }

    tracing::debug!(flow_id, step = step.label(), "completion for a closed flow dropped");
}

/// Open a flow when its screen becomes active and tear it down, with its
/// timers, when the screen goes away.
fn sync_flows(state: &mut AppState) -> Vec<Action> {
    let screen = state.screen();
    let mut actions = Vec::new();

    if screen == Screen::Deposit {
        if state.deposit.is_none() {
            let id = state.allocate_flow_id();
            let balance = state.config.position.wallet_weth_balance;
            state.deposit = Some(DepositFlow::new(id, balance));
        }
    } else if let Some(flow) = state.deposit.take() {
        if flow.is_busy() {
            state.store.set_loading(false);
        }
        actions.push(Action::CancelFlow { flow_id: flow.id });
    }

    if screen == Screen::Borrow {
        if state.borrow.is_none() {
            let id = state.allocate_flow_id();
            state.borrow = Some(BorrowFlow::new(id));
        }
    } else if let Some(flow) = state.borrow.take() {
        if flow.is_busy() {
            state.store.set_loading(false);
        }
        actions.push(Action::CancelFlow { flow_id: flow.id });
    }

    actions
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    match state.screen() {
        Screen::Connect => handle_connect_key(state, key),
        Screen::Onboarding => handle_onboarding_key(state, key),
        Screen::Dashboard => handle_dashboard_key(state, key),
        Screen::Deposit => handle_deposit_key(state, key),
        Screen::Borrow => handle_borrow_key(state, key),
    }
}

fn handle_connect_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if !state.connect_modal.visible {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('c') => {
                state.connect_modal.visible = true;
                vec![]
            }
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            _ => vec![],
        };
    }

    // Digits pick any listed adapter; 's' and 'e' take each chain's first.
    let (chain, adapter) = match key.code {
        KeyCode::Char('s') => (ChainFamily::Solana, 0),
        KeyCode::Char('e') => (ChainFamily::Evm, 0),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            match state.modal_entries().get(index) {
                Some(&entry) => entry,
                None => return vec![],
            }
        }
        KeyCode::Esc => {
            state.connect_modal.visible = false;
            return vec![];
        }
        _ => return vec![],
    };

    if state.wallet_address(chain).is_some() {
        let name = state.wallet_name(chain).to_string();
        state.info(format!("{} is already connected", name));
        return vec![];
    }
    if state.connect_modal.connecting.contains_key(&chain) {
        return vec![];
    }
    state.connect_modal.connecting.insert(chain, adapter);
    vec![Action::ConnectWallet { chain, adapter }]
}

fn handle_onboarding_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('a') => {
            if !state.protocol().is_loading {
                state.onboarding.agreed_to_terms = !state.onboarding.agreed_to_terms;
            }
            vec![]
        }
        KeyCode::Enter => {
            if state.protocol().is_loading {
                return vec![];
            }
            if !state.onboarding.agreed_to_terms {
                state.error("Accept the terms before minting your identity");
                return vec![];
            }
            state.store.set_loading(true);
            vec![Action::MintIdentity]
        }
        KeyCode::Char('q') => vec![Action::Quit],
        _ => vec![],
    }
}

fn handle_dashboard_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Char('d') => {
            state.store.set_current_view(View::Deposit);
            vec![]
        }
        KeyCode::Char('b') => {
            state.store.set_current_view(View::Borrow);
            vec![]
        }
        KeyCode::Char('q') => vec![Action::Quit],
        _ => vec![],
    }
}

fn handle_deposit_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.code == KeyCode::Esc {
        state.store.set_current_view(View::Dashboard);
        return vec![];
    }
    let Some(flow) = state.deposit.as_mut() else {
        return vec![];
    };

    match (flow.step.clone(), key.code) {
        (DepositStep::Input, KeyCode::Tab) => {
            flow.cycle_preset();
            vec![]
        }
        (DepositStep::Input, KeyCode::Enter) => {
            let result = flow.begin_approve();
            let flow_id = flow.id;
            schedule_or_report(state, flow_id, result)
        }
        (DepositStep::Approved { .. }, KeyCode::Enter) => {
            let result = flow.begin_deposit();
            let flow_id = flow.id;
            schedule_or_report(state, flow_id, result)
        }
        (DepositStep::Success { .. }, KeyCode::Enter) => {
            state.store.set_current_view(View::Dashboard);
            vec![]
        }
        (DepositStep::Input, code) => {
            edit_amount(&mut flow.amount, code);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_borrow_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.code == KeyCode::Esc {
        state.store.set_current_view(View::Dashboard);
        return vec![];
    }
    let protocol = state.store.state();
    let (collateral, units, tier) = (protocol.total_collateral, protocol.collateral_units(), protocol.tier);
    let Some(flow) = state.borrow.as_mut() else {
        return vec![];
    };

    match (flow.step.clone(), key.code) {
        (BorrowStep::Input, KeyCode::Enter) => {
            let quote = flow.quote(collateral, units, tier);
            let result = flow.begin_submit(&quote);
            let flow_id = flow.id;
            schedule_or_report(state, flow_id, result)
        }
        (BorrowStep::Submitted { .. }, KeyCode::Enter) => {
            state.store.set_current_view(View::Dashboard);
            vec![]
        }
        (BorrowStep::Input, code) => {
            edit_amount(&mut flow.amount, code);
            vec![]
        }
        _ => vec![],
    }
}

fn schedule_or_report(
    state: &mut AppState,
    flow_id: FlowId,
    result: Result<PendingStep, crate::app::flow::FlowError>,
) -> Vec<Action> {
    match result {
        Ok(step) => {
            state.store.set_loading(true);
            vec![Action::ScheduleFlowStep { flow_id, step }]
        }
        Err(e) => {
            state.error(e.to_string());
            vec![]
        }
    }
}

fn edit_amount(input: &mut AmountInput, code: KeyCode) {
    match code {
        KeyCode::Char(c) => {
            input.insert_char(c);
        }
        KeyCode::Backspace => input.delete_back(),
        KeyCode::Delete => input.delete_forward(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}
