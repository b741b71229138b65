use crate::app::state::*;
use crate::ui::theme::{self, Theme};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    if state.is_busy() {
        parts.push(Span::styled(
            format!(" {} ", theme::spinner(state.tick_count)),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ));
    }

    parts.push(Span::styled(format!(" {} ", state.status_line()), Theme::status_bar()));

    // Latest notice, right-aligned
    let notice = state.latest_notice().map(|n| {
        let fg = match n.kind {
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Error => Color::LightRed,
        };
        Span::styled(
            format!(" [{}] {} ", n.at.format("%H:%M:%S"), n.text),
            Style::default().fg(fg).bg(Color::DarkGray),
        )
    });

    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let notice_w = notice.as_ref().map(|n| n.content.width()).unwrap_or(0);
    let remaining = (area.width as usize).saturating_sub(used + notice_w);
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    if let Some(n) = notice {
        parts.push(n);
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
