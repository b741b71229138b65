use crate::app::state::AppState;
use crate::finance;
use crate::ui::theme::Theme;
use crate::ui::{layout, usd};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table};

const LOAN_APR: &str = "2.5% APR";

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let (left, right) = layout::two_columns(area);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(left);
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(6)])
        .split(right);

    render_trust_score(frame, left_chunks[0], state);
    render_position(frame, left_chunks[1], state);
    render_collateral(frame, right_chunks[0], state);
    render_loans(frame, right_chunks[1], state);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border())
}

fn render_trust_score(frame: &mut Frame, area: Rect, state: &AppState) {
    let protocol = state.protocol();
    let block = panel("Trust Score");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let summary = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", protocol.trust_score), Theme::value().add_modifier(Modifier::BOLD)),
            Span::styled(protocol.tier.label(), Theme::tier(protocol.tier)),
        ]),
        Line::from(Span::styled(
            format!(
                " LTV bonus +{}%  (max LTV {}%)",
                protocol.tier.ltv_bonus(),
                finance::effective_ltv(finance::BASE_LTV, protocol.tier)
            ),
            Theme::label(),
        )),
        Line::from(Span::styled(
            match protocol.tier.next() {
                Some(next) => format!(
                    " {} points to {}",
                    finance::points_to_next_tier(protocol.trust_score),
                    next.label()
                ),
                None => " Highest tier reached".to_string(),
            },
            Theme::label(),
        )),
    ];
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let progress = finance::tier_gauge_percent(protocol.trust_score, protocol.tier);
    let gauge = Gauge::default()
        .gauge_style(Theme::tier(protocol.tier))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress));
    frame.render_widget(gauge, chunks[1]);
}

fn render_position(frame: &mut Frame, area: Rect, state: &AppState) {
    let protocol = state.protocol();
    let block = panel("Net Position");

    let health = protocol.health_factor;
    let health_style = if health.is_unbounded() {
        Theme::positive()
    } else if health.is_at_risk() {
        Theme::negative()
    } else if health.value().is_some_and(|v| v < 1.5) {
        Theme::pending()
    } else {
        Theme::positive()
    };
    let ltv = finance::current_ltv(protocol.total_debt, protocol.total_collateral);

    let row = |label: &str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!(" {:<18}", label), Theme::label()),
            Span::styled(value, style),
        ])
    };
    let lines = vec![
        row("Total Collateral", usd(protocol.total_collateral), Theme::value()),
        row("Total Debt", usd(protocol.total_debt), Theme::value()),
        row("Net Value", usd(protocol.net_value), Theme::value().add_modifier(Modifier::BOLD)),
        row("Health Factor", protocol.health_factor.to_string(), health_style),
        row("Current LTV", format!("{:.1}%", ltv), Theme::risk(finance::RiskBand::from_ltv(ltv))),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_collateral(frame: &mut Frame, area: Rect, state: &AppState) {
    let protocol = state.protocol();
    let header = Row::new(["Asset", "Chain", "Amount", "Value"]).style(Theme::label());
    let rows = protocol.collateral_assets.iter().map(|asset| {
        Row::new(vec![
            Cell::from(asset.name.clone()),
            Cell::from(asset.chain.clone()),
            Cell::from(format!("{:.4} {}", asset.amount, asset.symbol)),
            Cell::from(usd(asset.value)),
        ])
        .style(Theme::value())
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(panel("My Collateral"));
    frame.render_widget(table, area);

    if protocol.collateral_assets.is_empty() {
        let inner = panel("").inner(area);
        let hint = Paragraph::new(Span::styled(" No collateral yet. Press d to deposit.", Theme::hint()));
        frame.render_widget(hint, Rect { y: inner.y + 1, height: 1, ..inner });
    }
}

fn render_loans(frame: &mut Frame, area: Rect, state: &AppState) {
    let protocol = state.protocol();
    let mut lines = Vec::new();
    if protocol.total_debt > 0.0 {
        lines.push(Line::from(vec![
            Span::styled(" USDC  ", Theme::value().add_modifier(Modifier::BOLD)),
            Span::styled("Solana  ", Theme::label()),
            Span::styled(usd(protocol.total_debt), Theme::value()),
            Span::styled(format!("  {}", LOAN_APR), Theme::label()),
        ]));
    } else {
        lines.push(Line::from(Span::styled(" No open loans", Theme::hint())));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(" d", Theme::key()),
        Span::styled(" deposit   ", Theme::hint()),
        Span::styled("b", Theme::key()),
        Span::styled(" borrow   ", Theme::hint()),
        Span::styled("q", Theme::key()),
        Span::styled(" quit", Theme::hint()),
    ]));
    frame.render_widget(Paragraph::new(lines).block(panel("My Loans")), area);
}
