//! TUI widgets

pub mod analytics;
pub mod bookings;
pub mod breakdown;
pub mod cards;
pub mod dashboard;
pub mod help;
pub mod spinner;
pub mod tabs;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::theme::Theme;
use tabs::{Tab, TabBar};

/// Maximum content width for every view (keeps layout clean on wide terminals)
pub const MAX_CONTENT_WIDTH: u16 = 120;

/// Center `area` horizontally, clamped to `MAX_CONTENT_WIDTH`
pub fn centered_content(area: Rect) -> Rect {
    let content_width = area.width.min(MAX_CONTENT_WIDTH);
    let x_offset = (area.width.saturating_sub(content_width)) / 2;
    Rect {
        x: area.x + x_offset,
        y: area.y,
        width: content_width,
        height: area.height,
    }
}

/// Smallest terminal that fits the shared chrome plus one body row
pub const MIN_HEIGHT: u16 = 8;
pub const MIN_WIDTH: u16 = 20;

pub fn render_separator(area: Rect, buf: &mut Buffer, theme: Theme) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }
    let line = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y, &line, Style::default().fg(theme.muted()));
}

/// Centered `key: description` hints
pub fn render_keybindings(area: Rect, buf: &mut Buffer, theme: Theme, bindings: &[(&str, &str)]) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }
    let mut spans = Vec::with_capacity(bindings.len() * 3);
    for (i, (key, desc)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent())));
        spans.push(Span::styled(
            format!(": {}", desc),
            Style::default().fg(theme.muted()),
        ));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Line under the view title: where the data came from, or what went wrong loading it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub warning: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warning: false,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warning: true,
        }
    }
}

/// Centered one-line notice, clipped to whatever room there is
pub fn render_notice(area: Rect, buf: &mut Buffer, text: &str, style: Style) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
        .alignment(Alignment::Center)
        .render(row, buf);
}

/// Common frame shared by every view: tab bar, title and status on top,
/// key hints at the bottom. Returns the area left for the view body,
/// which is empty when the terminal is below `MIN_WIDTH` x `MIN_HEIGHT`.
pub fn render_chrome(
    area: Rect,
    buf: &mut Buffer,
    tab: Tab,
    theme: Theme,
    title: &str,
    status: &StatusLine,
    bindings: &[(&str, &str)],
) -> Rect {
    let area = area.intersection(buf.area);
    if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
        render_notice(area, buf, "Terminal too small", Style::default().fg(theme.warn()));
        return Rect::new(area.x, area.y, 0, 0);
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Tabs
        Constraint::Length(1), // Separator
        Constraint::Length(1), // Title
        Constraint::Length(1), // Status
        Constraint::Length(1), // Blank
        Constraint::Fill(1),   // Body
        Constraint::Length(1), // Separator
        Constraint::Length(1), // Keybindings
    ])
    .split(area);

    TabBar::new(tab, theme).render(chunks[0], buf);
    render_separator(chunks[1], buf, theme);

    Paragraph::new(Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(theme.text())
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let status_color = if status.warning {
        theme.warn()
    } else {
        theme.muted()
    };
    Paragraph::new(Line::from(Span::styled(
        status.text.clone(),
        Style::default().fg(status_color),
    )))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    render_separator(chunks[6], buf, theme);
    render_keybindings(chunks[7], buf, theme, bindings);

    chunks[5]
}

/// Horizontal bar of `width` cells; any non-zero value gets at least one cell
pub fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max) * width as f64).round() as usize
    } else {
        0
    };
    let filled = if value > 0.0 { filled.max(1) } else { filled };
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
