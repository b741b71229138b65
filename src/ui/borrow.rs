use crate::app::flow::{BorrowQuote, BorrowStep};
use crate::app::state::AppState;
use crate::app::timers::short_hash;
use crate::finance::{self, RiskBand};
use crate::ui::theme::{self, Theme};
use crate::ui::{input_box, layout, usd};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" Borrow USDC on Solana ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(flow) = state.borrow.as_ref() else {
        return;
    };
    let protocol = state.protocol();
    let quote = flow.quote(protocol.total_collateral, protocol.collateral_units(), protocol.tier);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Amount field
            Constraint::Length(1), // LTV gauge
            Constraint::Min(7),    // Figures
            Constraint::Length(2), // Status
            Constraint::Length(1), // Keys
        ])
        .split(inner);

    let editable = flow.step == BorrowStep::Input;
    input_box::render(frame, chunks[0], "Amount", &flow.amount, "USDC", editable);

    let band = RiskBand::from_ltv(quote.current_ltv);
    let gauge = Gauge::default()
        .gauge_style(Theme::risk(band))
        .ratio((quote.current_ltv / quote.user_ltv.max(1.0)).clamp(0.0, 1.0))
        .label(format!("LTV {:.1}% of {}%", quote.current_ltv, quote.user_ltv));
    frame.render_widget(gauge, chunks[1]);

    let (left, right) = layout::two_columns(chunks[2]);
    frame.render_widget(Paragraph::new(limit_lines(state, &quote)), left);
    frame.render_widget(Paragraph::new(risk_lines(&quote, band)), right);

    let status = match &flow.step {
        BorrowStep::Input if quote.amount > quote.max_borrow_user => Line::from(Span::styled(
            format!(" Amount exceeds your limit of {}", usd(quote.max_borrow_user)),
            Theme::negative(),
        )),
        BorrowStep::Input => Line::default(),
        BorrowStep::Submitting => Line::from(Span::styled(
            format!(" {} Submitting borrow transaction...", theme::spinner(state.tick_count)),
            Theme::pending(),
        )),
        BorrowStep::Submitted { tx } => Line::from(vec![
            Span::styled(" Borrow transaction submitted to Solana ", Theme::positive()),
            Span::styled(short_hash(tx), Theme::label()),
        ]),
    };
    frame.render_widget(Paragraph::new(status), chunks[3]);

    let action = match flow.step {
        BorrowStep::Input => " borrow",
        BorrowStep::Submitting => " waiting...",
        BorrowStep::Submitted { .. } => " back to dashboard",
    };
    let keys = Line::from(vec![
        Span::styled(" Enter", Theme::key()),
        Span::styled(action, Theme::hint()),
        Span::styled("   Esc", Theme::key()),
        Span::styled(" cancel", Theme::hint()),
    ]);
    frame.render_widget(Paragraph::new(keys), chunks[4]);
}

fn figure(label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<20}", label), Theme::label()),
        Span::styled(value, style),
    ])
}

fn limit_lines(state: &AppState, quote: &BorrowQuote) -> Vec<Line<'static>> {
    let tier = state.protocol().tier;
    vec![
        figure("Collateral", usd(state.protocol().total_collateral), Theme::value()),
        figure("Base LTV", format!("{}%", finance::BASE_LTV), Theme::value()),
        figure(&format!("{} bonus", tier.label()), format!("+{}%", tier.ltv_bonus()), Theme::tier(tier)),
        figure("Your max LTV", format!("{}%", quote.user_ltv), Theme::value()),
        figure("Base max borrow", usd(quote.max_borrow_base), Theme::value()),
        figure("Your max borrow", usd(quote.max_borrow_user), Theme::value().add_modifier(Modifier::BOLD)),
        figure("Extra borrowing power", usd(quote.bonus_amount), Theme::positive()),
    ]
}

fn risk_lines(quote: &BorrowQuote, band: RiskBand) -> Vec<Line<'static>> {
    let band_label = match band {
        RiskBand::Safe => "Safe",
        RiskBand::Caution => "Caution",
        RiskBand::Danger => "Danger",
    };
    let health_style = if quote.health_factor.is_at_risk() { Theme::negative() } else { Theme::positive() };
    vec![
        figure("Current LTV", format!("{:.1}% ({})", quote.current_ltv, band_label), Theme::risk(band)),
        figure("Health factor", quote.health_factor.to_string(), health_style),
        figure("Liquidation price", format!("{}/WETH", usd(quote.liquidation_price)), Theme::value()),
    ]
}
