use crate::finance::{RiskBand, Tier};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const ACCENT_TEAL: Color = Color::Rgb(45, 212, 191);
    pub const ACCENT_VIOLET: Color = Color::Rgb(167, 139, 250);
    pub const BG_SURFACE: Color = Color::Rgb(24, 24, 32);
    pub const TEXT_MUTED: Color = Color::Rgb(120, 120, 140);

    pub fn border_type() -> BorderType {
        BorderType::Rounded
    }

    pub fn border() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_TEAL)
    }

    pub fn title() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::default().fg(Self::ACCENT_VIOLET).add_modifier(Modifier::BOLD)
    }

    pub fn label() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn value() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn hint() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn key() -> Style {
        Style::default().fg(Self::ACCENT_TEAL).add_modifier(Modifier::BOLD)
    }

    pub fn positive() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn negative() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn pending() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    pub fn tier(tier: Tier) -> Style {
        let color = match tier {
            Tier::Bronze => Color::Rgb(205, 127, 50),
            Tier::Silver => Color::Rgb(192, 192, 192),
            Tier::Gold => Color::Rgb(255, 215, 0),
            Tier::Platinum => Color::Rgb(229, 228, 226),
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn risk(band: RiskBand) -> Style {
        match band {
            RiskBand::Safe => Self::positive(),
            RiskBand::Caution => Self::pending(),
            RiskBand::Danger => Self::negative(),
        }
    }
}

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Spinner frame for the current tick.
pub fn spinner(tick: u64) -> char {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}
