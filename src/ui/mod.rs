mod borrow;
mod dashboard;
mod deposit;
mod input_box;
mod landing;
mod layout;
mod onboarding;
mod status_bar;
mod theme;

use crate::app::router::Screen;
use crate::app::state::AppState;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use theme::Theme;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);
    let screen = state.screen();

    render_header(frame, app_layout.header, screen);
    match screen {
        Screen::Connect => landing::render(frame, app_layout.body, state),
        Screen::Onboarding => onboarding::render(frame, app_layout.body, state),
        Screen::Dashboard => dashboard::render(frame, app_layout.body, state),
        Screen::Deposit => deposit::render(frame, app_layout.body, state),
        Screen::Borrow => borrow::render(frame, app_layout.body, state),
    }
    status_bar::render(frame, app_layout.status_bar, state);
}

fn render_header(frame: &mut Frame, area: Rect, screen: Screen) {
    let title = match screen {
        Screen::Connect => "Welcome",
        Screen::Onboarding => "Onboarding",
        Screen::Dashboard => "Protocol Dashboard",
        Screen::Deposit => "Deposit",
        Screen::Borrow => "Borrow",
    };
    let line = Line::from(vec![
        Span::styled(" Meridian ", Theme::heading()),
        Span::styled(format!("· {}", title), Theme::title()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// `$12,345.67`
pub(crate) fn usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::AppEvent;
    use crate::app::handler::handle_event;
    use crate::config::AppConfig;
    use crate::wallet::{ChainFamily, WalletAccount};
    use ratatui::backend::TestBackend;

    #[test]
    fn test_usd_grouping() {
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(999.5), "$999.50");
        assert_eq!(usd(30_000.0), "$30,000.00");
        assert_eq!(usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(usd(-5_000.0), "-$5,000.00");
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_every_screen_renders() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut state = AppState::new(AppConfig::default());
        state.connect_modal.visible = true;
        terminal.draw(|f| render(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Connect Wallets"));

        for (chain, addr) in [(ChainFamily::Solana, "So1anaAddress"), (ChainFamily::Evm, "0xEvmAddress")] {
            handle_event(
                &mut state,
                AppEvent::WalletConnected {
                    chain,
                    adapter: 0,
                    account: WalletAccount { address: addr.into(), balance: 1.0 },
                },
            );
        }
        terminal.draw(|f| render(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Your Identity Anchor"));

        handle_event(&mut state, AppEvent::IdentityMinted);
        terminal.draw(|f| render(f, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Trust Score"));
        assert!(text.contains("$30,000.00"));

        state.store.set_current_view(crate::app::store::View::Deposit);
        handle_event(&mut state, AppEvent::Tick);
        terminal.draw(|f| render(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Deposit WETH"));

        state.store.set_current_view(crate::app::store::View::Borrow);
        handle_event(&mut state, AppEvent::Tick);
        terminal.draw(|f| render(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Your max borrow"));
    }

    #[test]
    fn test_modal_lists_adapters_with_keys() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut state = AppState::new(AppConfig::default());
        state.connect_modal.visible = true;
        terminal.draw(|f| render(f, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("[1] Solana  Phantom"));
        assert!(text.contains("[2] Solana  Solflare"));
        assert!(text.contains("[3] EVM"));
    }

    #[test]
    fn test_top_tier_gauge_reads_full() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut config = AppConfig::default();
        config.position.trust_score = 1130;
        let mut state = AppState::new(config);
        for (chain, addr) in [(ChainFamily::Solana, "So1anaAddress"), (ChainFamily::Evm, "0xEvmAddress")] {
            handle_event(
                &mut state,
                AppEvent::WalletConnected {
                    chain,
                    adapter: 0,
                    account: WalletAccount { address: addr.into(), balance: 1.0 },
                },
            );
        }
        handle_event(&mut state, AppEvent::IdentityMinted);
        terminal.draw(|f| render(f, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Highest tier reached"));
        assert!(text.contains("100%"));
        assert!(!text.contains("52%"));
    }
}
