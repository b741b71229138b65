use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub body: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        header: chunks[0],
        body: chunks[1],
        status_bar: chunks[2],
    }
}

/// Centered popup of `percent_w`% by `percent_h`%, clamped to at least
/// `min_w` x `min_h` where the area allows.
pub fn centered(area: Rect, percent_w: u16, percent_h: u16, min_w: u16, min_h: u16) -> Rect {
    let w = (area.width * percent_w / 100).max(min_w).min(area.width);
    let h = (area.height * percent_h / 100).max(min_h).min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Split `area` into two equal columns with a one-cell gap.
pub fn two_columns(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    (chunks[0], chunks[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_reserves_header_and_status() {
        let layout = compute_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.status_bar.y, 23);
        assert_eq!(layout.body.height, 22);
    }

    #[test]
    fn test_centered_popup_fits() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered(area, 50, 50, 60, 20);
        assert_eq!(popup, area);
        let popup = centered(Rect::new(0, 0, 100, 40), 50, 50, 10, 10);
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }
}
