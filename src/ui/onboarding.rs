use crate::app::state::{short_address, AppState};
use crate::ui::theme::{self, Theme};
use crate::wallet::ChainFamily;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

const BENEFITS: [(&str, &str); 3] = [
    ("Build On-Chain Reputation", "Your positive actions are rewarded and tracked permanently"),
    ("Unlock Better Loan Terms", "Higher Trust Score means higher LTVs and lower fees"),
    ("Single Identity Across All Chains", "Your reputation follows you everywhere"),
];

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Create Your Omni-Chain Financial Identity ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::default()];
    for (title, text) in BENEFITS {
        lines.push(Line::from(Span::styled(format!("  * {}", title), Theme::heading())));
        lines.push(Line::from(Span::styled(format!("    {}", text), Theme::label())));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("  Your Identity Anchor", Theme::title())));
    for chain in ChainFamily::ALL {
        let addr = state.wallet_address(chain).map(short_address).unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("    {:<8}", chain.to_string()), Theme::label()),
            Span::styled(addr, Theme::value()),
        ]));
    }

    lines.push(Line::default());
    let check = if state.onboarding.agreed_to_terms { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::styled(format!("  {} ", check), Theme::key()),
        Span::styled("I agree to the Terms of Service and Privacy Policy", Theme::value()),
    ]));
    lines.push(Line::default());

    if state.protocol().is_loading {
        lines.push(Line::from(Span::styled(
            format!("  {} Minting your identity...", theme::spinner(state.tick_count)),
            Theme::pending(),
        )));
    } else {
        let enter_style = if state.onboarding.agreed_to_terms { Theme::key() } else { Theme::hint() };
        lines.push(Line::from(vec![
            Span::styled("  Space", Theme::key()),
            Span::styled(" toggle terms   ", Theme::hint()),
            Span::styled("Enter", enter_style),
            Span::styled(" create identity", Theme::hint()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
