//! Screen selection from store state.

use crate::app::store::{ProtocolState, View};

/// Top-level screen the UI should present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Connect,
    Onboarding,
    Dashboard,
    Deposit,
    Borrow,
}

/// Pick the screen for `state`. Wallets gate onboarding, onboarding gates
/// the rest.
pub fn route(state: &ProtocolState) -> Screen {
    if !state.is_wallet_connected {
        return Screen::Connect;
    }
    if !state.has_user_profile {
        return Screen::Onboarding;
    }
    match state.current_view {
        View::Dashboard => Screen::Dashboard,
        View::Deposit => Screen::Deposit,
        View::Borrow => Screen::Borrow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::Store;

    #[test]
    fn test_disconnected_always_routes_to_connect() {
        let mut store = Store::new(ProtocolState::default());
        assert_eq!(route(store.state()), Screen::Connect);

        store.create_user_profile();
        store.set_current_view(View::Borrow);
        store.set_loading(true);
        assert_eq!(route(store.state()), Screen::Connect);

        store.connect_solana_wallet("So1", 1.0);
        assert_eq!(route(store.state()), Screen::Connect);
    }

    #[test]
    fn test_onboarding_before_profile() {
        let mut store = Store::new(ProtocolState::default());
        store.connect_solana_wallet("So1", 12.5);
        store.connect_evm_wallet("0xabc", 0.8);
        store.set_current_view(View::Deposit);
        assert_eq!(route(store.state()), Screen::Onboarding);
    }

    #[test]
    fn test_dispatch_on_view_after_profile() {
        let mut store = Store::new(ProtocolState::default());
        store.connect_solana_wallet("So1", 12.5);
        store.connect_evm_wallet("0xabc", 0.8);
        store.create_user_profile();
        assert_eq!(route(store.state()), Screen::Dashboard);

        store.set_current_view(View::Borrow);
        assert!(store.state().has_user_profile);
        assert!(!store.state().is_loading);
        assert_eq!(route(store.state()), Screen::Borrow);

        store.set_current_view(View::Deposit);
        assert_eq!(route(store.state()), Screen::Deposit);

        store.set_current_view(View::from_name("nonsense"));
        assert_eq!(route(store.state()), Screen::Dashboard);
    }
}
