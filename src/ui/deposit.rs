use crate::app::flow::{DepositFlow, DepositStep, DEPOSIT_PRESETS};
use crate::app::state::AppState;
use crate::app::timers::short_hash;
use crate::ui::theme::{self, Theme};
use crate::ui::{input_box, usd};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Deposit WETH from Sepolia ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(flow) = state.deposit.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Balance
            Constraint::Length(3), // Amount field
            Constraint::Length(2), // Presets / value
            Constraint::Min(4),    // Steps
            Constraint::Length(1), // Keys
        ])
        .split(inner);

    let balance = Line::from(vec![
        Span::styled(" Wallet balance  ", Theme::label()),
        Span::styled(format!("{} WETH", flow.wallet_balance), Theme::value()),
    ]);
    frame.render_widget(Paragraph::new(balance), chunks[0]);

    let editable = flow.step == DepositStep::Input;
    input_box::render(frame, chunks[1], "Amount", &flow.amount, "WETH", editable);

    let price = state.config.position.weth_price_usd;
    let presets: Vec<String> = DEPOSIT_PRESETS
        .iter()
        .map(|f| if *f >= 1.0 { "MAX".to_string() } else { format!("{:.0}%", f * 100.0) })
        .collect();
    let summary = Line::from(vec![
        Span::styled(" Tab", Theme::key()),
        Span::styled(format!(" presets {}   ", presets.join("/")), Theme::hint()),
        Span::styled("Value ", Theme::label()),
        Span::styled(usd(flow.parsed_amount().unwrap_or(0.0) * price), Theme::value()),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[2]);

    frame.render_widget(
        Paragraph::new(step_lines(flow, state.tick_count)).wrap(Wrap { trim: false }),
        chunks[3],
    );

    let action = match flow.step {
        DepositStep::Input => " approve WETH",
        DepositStep::Approved { .. } => " deposit",
        DepositStep::Success { .. } => " back to dashboard",
        _ => " waiting...",
    };
    let keys = Line::from(vec![
        Span::styled(" Enter", Theme::key()),
        Span::styled(action, Theme::hint()),
        Span::styled("   Esc", Theme::key()),
        Span::styled(" cancel", Theme::hint()),
    ]);
    frame.render_widget(Paragraph::new(keys), chunks[4]);
}

fn step_lines(flow: &DepositFlow, tick: u64) -> Vec<Line<'static>> {
    let spin = theme::spinner(tick);
    let done = |label: &str, tx: &str| {
        Line::from(vec![
            Span::styled(format!(" [x] {:<22}", label), Theme::positive()),
            Span::styled(short_hash(tx), Theme::label()),
        ])
    };
    let busy = |label: &str| Line::from(Span::styled(format!(" [{}] {}", spin, label), Theme::pending()));
    let todo = |label: &str| Line::from(Span::styled(format!(" [ ] {}", label), Theme::hint()));

    match &flow.step {
        DepositStep::Input => vec![todo("1. Approve WETH spend"), todo("2. Deposit to vault")],
        DepositStep::Approving => vec![busy("1. Approving WETH spend..."), todo("2. Deposit to vault")],
        DepositStep::Approved { approve_tx } => {
            vec![done("1. Approved", approve_tx), todo("2. Deposit to vault")]
        }
        DepositStep::Depositing { approve_tx } => vec![
            done("1. Approved", approve_tx),
            busy("2. Depositing, waiting for cross-chain confirmation..."),
        ],
        DepositStep::Success { approve_tx, deposit_tx } => vec![
            done("1. Approved", approve_tx),
            done("2. Deposited", deposit_tx),
            Line::default(),
            Line::from(Span::styled(
                " Collateral credited to your Solana position.",
                Theme::positive().add_modifier(Modifier::BOLD),
            )),
        ],
    }
}
