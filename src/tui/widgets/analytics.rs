//! Analytics view - monthly summary cards and the daily booking trend

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    widgets::Widget,
};

use super::cards::{cards_per_row, grid_height, CardGrid, StatCard};
use super::tabs::Tab;
use super::{centered_content, render_chrome, render_notice, StatusLine};
use crate::format::{format_compact, format_currency, format_number};
use crate::tui::theme::Theme;
use crate::types::{AnalyticsReport, DailyPoint};

const KEYBINDINGS: &[(&str, &str)] = &[
    ("←→", "Month"),
    ("Tab", "Switch view"),
    ("r", "Reload"),
    ("?", "Help"),
    ("q", "Quit"),
];

/// Eighth-block glyphs for sub-cell bar heights
const BAR_GLYPHS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Rows reserved under the chart for day labels
const AXIS_ROWS: u16 = 1;

/// Title with month navigation arrows, e.g. "◀ March 2024 ▶"
pub fn month_title(report: &AnalyticsReport) -> String {
    format!("◀ {} ▶", report.month.label())
}

/// Analytics view widget
pub struct AnalyticsView<'a> {
    report: &'a AnalyticsReport,
    status: &'a StatusLine,
    theme: Theme,
}

impl<'a> AnalyticsView<'a> {
    pub fn new(report: &'a AnalyticsReport, status: &'a StatusLine, theme: Theme) -> Self {
        Self {
            report,
            status,
            theme,
        }
    }

    fn build_cards(&self) -> Vec<StatCard> {
        let m = &self.report.monthly;
        let t = self.theme;
        vec![
            StatCard::new("Bookings", format_number(m.total_bookings), t.accent()),
            StatCard::new("Revenue", format_currency(m.total_revenue), t.money()),
            StatCard::new("Completed", format_number(m.completed_trips), t.bar()),
            StatCard::new("Average Fare", format_currency(m.average_fare), t.stat_blue()),
        ]
    }

    /// Shown instead of zeroed cards when no bookings were loaded at all
    fn render_no_data(&self, area: Rect, buf: &mut Buffer) {
        let [heading, detail] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        render_notice(
            heading,
            buf,
            "No data available",
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );
        render_notice(
            detail,
            buf,
            "No bookings found for analytics",
            Style::default().fg(self.theme.muted()),
        );
    }
}

impl Widget for AnalyticsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = centered_content(area);
        let title = month_title(self.report);
        let body = render_chrome(
            area,
            buf,
            Tab::Analytics,
            self.theme,
            &title,
            self.status,
            KEYBINDINGS,
        );
        if body.is_empty() {
            return;
        }

        if self.report.is_empty() {
            self.render_no_data(body, buf);
            return;
        }

        let cards = self.build_cards();
        let cols = cards_per_row(body.width, 4);
        let chunks = Layout::vertical([
            Constraint::Length(grid_height(cards.len(), cols)),
            Constraint::Length(1), // Chart title
            Constraint::Fill(1),   // Chart
        ])
        .split(body);

        CardGrid::new(&cards, cols).render(chunks[0], buf);

        let caption = format!(
            "Daily bookings (peak {}, top day revenue {})",
            self.report.daily_max_bookings(),
            format_compact(self.report.daily_max_revenue())
        );
        if chunks[1].height > 0 {
            buf.set_stringn(
                chunks[1].x + 2,
                chunks[1].y,
                &caption,
                chunks[1].width.saturating_sub(2) as usize,
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            );
        }

        DailyChart::new(&self.report.daily, self.report.daily_max_bookings(), self.theme)
            .render(chunks[2], buf);
    }
}

/// Column chart with one column per day of the month
pub struct DailyChart<'a> {
    days: &'a [DailyPoint],
    max: u64,
    theme: Theme,
}

impl<'a> DailyChart<'a> {
    pub fn new(days: &'a [DailyPoint], max: u64, theme: Theme) -> Self {
        Self { days, max, theme }
    }

    /// Column height in eighths of a cell
    pub fn column_eighths(bookings: u64, max: u64, rows: u16) -> u32 {
        if max == 0 || bookings == 0 {
            return 0;
        }
        let total = rows as u64 * 8;
        let eighths = (bookings * total).div_ceil(max);
        eighths.clamp(1, total) as u32
    }

    /// Cells per day: 3 when there is room, 2 otherwise
    fn column_width(&self, width: u16) -> u16 {
        let days = self.days.len().max(1) as u16;
        if days * 3 <= width {
            3
        } else {
            2
        }
    }
}

impl Widget for DailyChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height <= AXIS_ROWS || self.days.is_empty() {
            return;
        }

        let col_width = self.column_width(area.width);
        let chart_width = self.days.len() as u16 * col_width;
        let x0 = area.x + area.width.saturating_sub(chart_width) / 2;
        let rows = area.height - AXIS_ROWS;
        let baseline = area.y + rows; // axis row
        let bar_style = Style::default().fg(self.theme.bar());

        for (i, point) in self.days.iter().enumerate() {
            let x = x0 + i as u16 * col_width;
            if x + col_width > area.x + area.width {
                break;
            }

            let mut eighths = Self::column_eighths(point.bookings, self.max, rows);
            let mut y = baseline;
            while eighths > 0 && y > area.y {
                y -= 1;
                let glyph = BAR_GLYPHS[(eighths.min(8) - 1) as usize];
                buf.set_string(x, y, glyph.repeat((col_width - 1) as usize), bar_style);
                eighths = eighths.saturating_sub(8);
            }

            // Label day 1 and every 5th day
            if point.day == 1 || point.day % 5 == 0 {
                buf.set_string(
                    x,
                    baseline,
                    format!("{:<width$}", point.day, width = col_width as usize),
                    Style::default().fg(self.theme.muted()),
                );
            }
        }
    }
}
