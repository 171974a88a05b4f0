//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 18;

const NAVIGATION: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Switch view"),
    ("1-4", "Jump to view"),
    ("← → or [ ]", "Change month"),
    ("Up/Down or j/k", "Scroll (Bookings)"),
];

const GENERAL: &[(&str, &str)] = &[
    ("r", "Reload from backend"),
    ("q / Esc", "Quit"),
    ("?", "Toggle help"),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn render_section(&self, header: Rect, sep: Rect, buf: &mut Buffer, title: &str) {
        let line = Line::from(vec![Span::styled(
            title.to_string(),
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )]);
        Paragraph::new(line)
            .alignment(Alignment::Left)
            .render(header, buf);

        if sep.height == 0 {
            return;
        }
        let rule = "─".repeat(sep.width as usize);
        buf.set_string(sep.x, sep.y, &rule, Style::default().fg(self.theme.muted()));
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" cabdash v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Padding
            Constraint::Length(1), // [1] Navigation header
            Constraint::Length(1), // [2] Separator
            Constraint::Length(NAVIGATION.len() as u16), // [3] Navigation keys
            Constraint::Length(1), // [4] Padding
            Constraint::Length(1), // [5] General header
            Constraint::Length(1), // [6] Separator
            Constraint::Length(GENERAL.len() as u16), // [7] General keys
            Constraint::Length(1), // [8] Padding
            Constraint::Length(1), // [9] Close hint
            Constraint::Min(0),
        ])
        .split(inner);

        self.render_section(chunks[1], chunks[2], buf, "Navigation");
        render_keybindings(chunks[3], buf, NAVIGATION, self.theme);

        self.render_section(chunks[5], chunks[6], buf, "General");
        render_keybindings(chunks[7], buf, GENERAL, self.theme);

        let hint = Line::from(vec![Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[9], buf);
    }
}

/// Render one keybinding per line
fn render_keybindings(area: Rect, buf: &mut Buffer, bindings: &[(&str, &str)], theme: Theme) {
    for (i, (key, desc)) in bindings.iter().enumerate() {
        let y = area.y + i as u16;
        if y >= area.y + area.height {
            break;
        }
        let line = Line::from(vec![
            Span::styled(format!("  {:<18}", key), Style::default().fg(theme.accent())),
            Span::styled(*desc, Style::default().fg(theme.text())),
        ]);
        buf.set_line(area.x, y, &line, area.width);
    }
}
