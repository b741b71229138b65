use crate::app::input::AmountInput;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Amount entry field. The cursor is only shown while the field is editable.
pub fn render(frame: &mut Frame, area: Rect, title: &str, input: &AmountInput, unit: &str, editable: bool) {
    let border_style = if editable { Theme::border_focused() } else { Theme::border() };

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(if editable { Theme::title() } else { Theme::border() })
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(border_style)
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let amount = if input.is_empty() {
        Span::styled("0.00", Theme::hint())
    } else {
        Span::styled(input.text.as_str(), Theme::input_text())
    };
    let line = Line::from(vec![
        Span::styled("❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
        amount,
        Span::styled(format!(" {}", unit), Theme::label()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    if editable && inner.width > 0 && inner.height > 0 {
        // Chevron "❯ " is two cells wide
        let cursor_x = inner.x + 2 + input.cursor as u16;
        frame.set_cursor_position((cursor_x.min(inner.right() - 1), inner.y));
    }
}
