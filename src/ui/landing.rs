use crate::app::state::{short_address, AppState};
use crate::ui::layout;
use crate::ui::theme::{self, Theme};
use crate::wallet::ChainFamily;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const FEATURES: [(&str, &str); 3] = [
    ("Unified collateral", "Deposit on EVM chains, borrow on Solana"),
    ("Trust-based terms", "Your on-chain reputation raises your LTV"),
    ("One identity", "A single profile across every chain"),
];

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled("MeridianProtocol", Theme::heading())).centered(),
        Line::from(Span::styled(
            "Next-generation omni-chain financial infrastructure",
            Theme::label(),
        ))
        .centered(),
        Line::default(),
    ];
    for (title, text) in FEATURES {
        lines.push(
            Line::from(vec![
                Span::styled(format!("  {} ", title), Theme::value().add_modifier(Modifier::BOLD)),
                Span::styled(text, Theme::label()),
            ])
            .centered(),
        );
    }
    lines.push(Line::default());
    lines.push(
        Line::from(vec![
            Span::styled("Enter", Theme::key()),
            Span::styled(" connect wallets   ", Theme::hint()),
            Span::styled("q", Theme::key()),
            Span::styled(" quit", Theme::hint()),
        ])
        .centered(),
    );

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    if state.connect_modal.visible {
        render_modal(frame, area, state);
    }
}

fn render_modal(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state.modal_entries().len().min(9) as u16;
    let popup = layout::centered(area, 60, 50, 50, 8 + rows);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Connect Wallets ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Style::default().fg(Theme::ACCENT_TEAL))
        .style(Style::default().bg(Theme::BG_SURFACE));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![
        Line::from(Span::styled(
            "Connect one wallet per chain family to continue.",
            Theme::label(),
        )),
        Line::default(),
    ];
    let entries = state.modal_entries();
    for (i, &(chain, adapter)) in entries.iter().enumerate().take(9) {
        lines.push(wallet_row(state, chain, adapter, i + 1));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(format!("1-{}", entries.len().min(9)), Theme::key()),
        Span::styled(" connect   ", Theme::hint()),
        Span::styled("Esc", Theme::key()),
        Span::styled(" close", Theme::hint()),
    ]));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn wallet_row<'a>(state: &'a AppState, chain: ChainFamily, adapter: usize, key: usize) -> Line<'a> {
    let connected_here = state.connected_adapter.get(&chain) == Some(&adapter);
    let connecting_here = state.connect_modal.connecting.get(&chain) == Some(&adapter);
    let status = match state.wallet_address(chain) {
        Some(addr) if connected_here => Span::styled(
            format!("connected {} ({:.4} {})", short_address(addr), state.wallet_balance(chain), chain.native_symbol()),
            Theme::positive(),
        ),
        Some(_) => Span::styled(format!("{} already connected", chain), Theme::hint()),
        None if connecting_here => {
            Span::styled(format!("{} waiting for approval", theme::spinner(state.tick_count)), Theme::pending())
        }
        None => Span::styled("not connected", Theme::hint()),
    };

    Line::from(vec![
        Span::styled(format!(" [{}] ", key), Theme::key()),
        Span::styled(format!("{:<8}", chain.to_string()), Theme::value()),
        Span::styled(format!("{:<10}", state.adapter_name(chain, adapter)), Theme::label()),
        status,
    ])
}
