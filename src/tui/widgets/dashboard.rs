//! Dashboard view - headline counters and the latest bookings

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::cards::{cards_per_row, grid_height, CardGrid, StatCard};
use super::tabs::Tab;
use super::{centered_content, render_chrome, StatusLine};
use crate::format::{format_currency, format_number, truncate};
use crate::services::DashboardStats;
use crate::tui::theme::Theme;
use crate::types::Booking;

const KEYBINDINGS: &[(&str, &str)] = &[
    ("Tab", "Switch view"),
    ("r", "Reload"),
    ("?", "Help"),
    ("q", "Quit"),
];

/// Dashboard view widget
pub struct DashboardView<'a> {
    stats: &'a DashboardStats,
    recent: &'a [&'a Booking],
    status: &'a StatusLine,
    theme: Theme,
}

impl<'a> DashboardView<'a> {
    pub fn new(
        stats: &'a DashboardStats,
        recent: &'a [&'a Booking],
        status: &'a StatusLine,
        theme: Theme,
    ) -> Self {
        Self {
            stats,
            recent,
            status,
            theme,
        }
    }

    fn build_cards(&self) -> Vec<StatCard> {
        let t = self.theme;
        vec![
            StatCard::new(
                "Total Bookings",
                format_number(self.stats.total_bookings),
                t.accent(),
            ),
            StatCard::new(
                "Today's Trips",
                format_number(self.stats.today_bookings),
                t.date(),
            ),
            StatCard::new(
                "This Month",
                format_currency(self.stats.this_month_revenue),
                t.money(),
            ),
            StatCard::new(
                "Pending",
                format_number(self.stats.pending_bookings),
                t.warn(),
            ),
            StatCard::new(
                "Active Rides",
                format_number(self.stats.active_rides),
                t.stat_blue(),
            ),
            StatCard::new(
                "Completed",
                format_number(self.stats.completed_bookings),
                t.bar(),
            ),
        ]
    }

    fn render_recent(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let header = format!(
            "Recent Bookings ({} contact messages)",
            format_number(self.stats.total_contacts)
        );
        buf.set_stringn(
            area.x + 2,
            area.y,
            &header,
            area.width.saturating_sub(2) as usize,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        if self.recent.is_empty() {
            if area.height > 1 {
                buf.set_string(
                    area.x + 2,
                    area.y + 1,
                    "No bookings yet",
                    Style::default().fg(self.theme.muted()),
                );
            }
            return;
        }

        for (i, booking) in self.recent.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled(
                    format!("  {:<12}", booking.booking_id),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(
                    format!("{:<20}", truncate(&booking.user_name, 19)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:<28}", truncate(&booking.pick_up_location, 27)),
                    Style::default().fg(self.theme.muted()),
                ),
                Span::styled(
                    format!("{:<12}", booking.ride_status.label()),
                    Style::default().fg(self.theme.status(booking.ride_status)),
                ),
                Span::styled(
                    format!("{:>10}", format_currency(booking.estimated_fare)),
                    Style::default().fg(self.theme.money()),
                ),
            ]);
            buf.set_line(area.x, y, &line, area.width);
        }
    }
}

impl Widget for DashboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = centered_content(area);
        let body = render_chrome(
            area,
            buf,
            Tab::Dashboard,
            self.theme,
            "Dashboard",
            self.status,
            KEYBINDINGS,
        );
        if body.is_empty() {
            return;
        }

        let cards = self.build_cards();
        let cols = cards_per_row(body.width, 3);
        let chunks = Layout::vertical([
            Constraint::Length(grid_height(cards.len(), cols)),
            Constraint::Fill(1),
        ])
        .split(body);

        CardGrid::new(&cards, cols).render(chunks[0], buf);
        self.render_recent(chunks[1], buf);
    }
}
