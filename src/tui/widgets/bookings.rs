//! Bookings table widget - scrollable list of every loaded booking

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::tabs::Tab;
use super::{centered_content, render_chrome, StatusLine};
use crate::format::{format_currency, format_number, truncate};
use crate::tui::theme::Theme;
use crate::types::Booking;

const KEYBINDINGS: &[(&str, &str)] = &[
    ("↑↓", "Scroll"),
    ("Tab", "Switch view"),
    ("r", "Reload"),
    ("?", "Help"),
    ("q", "Quit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Booking,
    Customer,
    Route,
    Service,
    Car,
    Status,
    Journey,
    Fare,
}

impl Column {
    const ALL: [Column; 8] = [
        Column::Booking,
        Column::Customer,
        Column::Route,
        Column::Service,
        Column::Car,
        Column::Status,
        Column::Journey,
        Column::Fare,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Booking => "BOOKING",
            Self::Customer => "CUSTOMER",
            Self::Route => "ROUTE",
            Self::Service => "SERVICE",
            Self::Car => "CAR",
            Self::Status => "STATUS",
            Self::Journey => "JOURNEY",
            Self::Fare => "FARE",
        }
    }

    fn width(self) -> u16 {
        match self {
            Self::Booking => 14,
            Self::Customer => 18,
            Self::Route => 30,
            Self::Service => 11,
            Self::Car => 10,
            Self::Status => 12,
            Self::Journey => 12,
            Self::Fare => 11,
        }
    }
}

/// Columns that fit `width`. Car goes first, then Service, then Customer.
fn visible_columns(width: u16) -> Vec<Column> {
    const HIDE_ORDER: [Column; 3] = [Column::Car, Column::Service, Column::Customer];

    let mut visible = Column::ALL.to_vec();
    for hidden in HIDE_ORDER {
        if table_width(&visible) <= width {
            break;
        }
        visible.retain(|&c| c != hidden);
    }
    visible
}

fn table_width(columns: &[Column]) -> u16 {
    columns.iter().map(|c| c.width()).sum()
}

/// Bookings table view
pub struct BookingsView<'a> {
    bookings: &'a [Booking],
    scroll: usize,
    status: &'a StatusLine,
    theme: Theme,
}

impl<'a> BookingsView<'a> {
    pub fn new(bookings: &'a [Booking], scroll: usize, status: &'a StatusLine, theme: Theme) -> Self {
        Self {
            bookings,
            scroll,
            status,
            theme,
        }
    }

    /// Largest useful scroll offset for `count` rows in a body of `visible_rows`
    pub fn max_scroll(count: usize, visible_rows: usize) -> usize {
        count.saturating_sub(visible_rows)
    }

    /// Body rows left for bookings on a terminal of `height`
    /// (chrome takes 7 rows, the header one more)
    pub fn visible_rows(height: u16) -> usize {
        height.saturating_sub(8) as usize
    }

    fn cell(&self, column: Column, booking: &Booking) -> (String, Style) {
        let width = column.width() as usize;
        let text_width = width.saturating_sub(2);
        match column {
            Column::Booking => (
                format!("  {:<w$}", truncate(&booking.booking_id, text_width), w = text_width),
                Style::default().fg(self.theme.accent()),
            ),
            Column::Customer => (
                format!("{:<width$}", truncate(&booking.user_name, text_width)),
                Style::default().fg(self.theme.text()),
            ),
            Column::Route => {
                let route = booking
                    .route_label()
                    .unwrap_or_else(|| booking.pick_up_location.clone());
                (
                    format!("{:<width$}", truncate(&route, text_width)),
                    Style::default().fg(self.theme.text()),
                )
            }
            Column::Service => (
                format!("{:<width$}", booking.service_type.label()),
                Style::default().fg(self.theme.muted()),
            ),
            Column::Car => (
                format!("{:<width$}", booking.car_type.label()),
                Style::default().fg(self.theme.muted()),
            ),
            Column::Status => (
                format!("{:<width$}", booking.ride_status.label()),
                Style::default().fg(self.theme.status(booking.ride_status)),
            ),
            Column::Journey => (
                format!("{:<width$}", booking.journey_date.format("%d %b %Y").to_string()),
                Style::default().fg(self.theme.date()),
            ),
            Column::Fare => (
                format!("{:>width$}", format_currency(booking.estimated_fare)),
                Style::default().fg(self.theme.money()),
            ),
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, columns: &[Column]) {
        let style = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let spans: Vec<Span> = columns
            .iter()
            .map(|&c| {
                let width = c.width() as usize;
                let text = match c {
                    Column::Booking => format!("  {:<w$}", c.label(), w = width - 2),
                    Column::Fare => format!("{:>width$}", c.label()),
                    _ => format!("{:<width$}", c.label()),
                };
                Span::styled(text, style)
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Left)
            .render(area, buf);
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer, columns: &[Column]) {
        if self.bookings.is_empty() {
            if area.height > 0 {
                buf.set_string(
                    area.x + 2,
                    area.y,
                    "No bookings",
                    Style::default().fg(self.theme.muted()),
                );
            }
            return;
        }

        let rows = self
            .bookings
            .iter()
            .skip(self.scroll)
            .take(area.height as usize);
        for (i, booking) in rows.enumerate() {
            let spans: Vec<Span> = columns
                .iter()
                .map(|&c| {
                    let (text, style) = self.cell(c, booking);
                    Span::styled(text, style)
                })
                .collect();
            buf.set_line(area.x, area.y + i as u16, &Line::from(spans), area.width);
        }
    }
}

impl Widget for BookingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = centered_content(area);
        let title = format!("Bookings ({})", format_number(self.bookings.len() as u64));
        let body = render_chrome(
            area,
            buf,
            Tab::Bookings,
            self.theme,
            &title,
            self.status,
            KEYBINDINGS,
        );
        if body.is_empty() {
            return;
        }

        let columns = visible_columns(body.width);
        let offset = body.width.saturating_sub(table_width(&columns)) / 2;
        let table = Rect {
            x: body.x + offset,
            width: table_width(&columns).min(body.width),
            ..body
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Fill(1),   // Rows
        ])
        .split(table);

        self.render_header(chunks[0], buf, &columns);
        self.render_rows(chunks[1], buf, &columns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_booking(id: &str, drop: Option<&str>) -> Booking {
        Booking {
            booking_id: id.into(),
            user_name: "Asha Rao".into(),
            pick_up_location: "Mumbai".into(),
            drop_location: drop.map(String::from),
            journey_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            estimated_fare: 1850.0,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            ..Booking::default()
        }
    }

    fn render(bookings: &[Booking], scroll: usize, width: u16, height: u16) -> String {
        let status = StatusLine::default();
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        BookingsView::new(bookings, scroll, &status, Theme::Dark).render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    // ========== visible_columns() tests ==========

    #[test]
    fn test_visible_columns_wide() {
        assert_eq!(visible_columns(120), Column::ALL.to_vec());
    }

    #[test]
    fn test_visible_columns_hides_car_first() {
        let full = table_width(&Column::ALL);
        let cols = visible_columns(full - 1);
        assert!(!cols.contains(&Column::Car));
        assert!(cols.contains(&Column::Service));
    }

    #[test]
    fn test_visible_columns_narrow_keeps_core() {
        let cols = visible_columns(60);
        assert!(cols.contains(&Column::Booking));
        assert!(cols.contains(&Column::Fare));
        assert!(!cols.contains(&Column::Customer));
    }

    // ========== scroll tests ==========

    #[test]
    fn test_max_scroll() {
        assert_eq!(BookingsView::max_scroll(50, 20), 30);
        assert_eq!(BookingsView::max_scroll(5, 20), 0);
    }

    #[test]
    fn test_visible_rows() {
        assert_eq!(BookingsView::visible_rows(30), 22);
        assert_eq!(BookingsView::visible_rows(4), 0);
    }

    // ========== render tests ==========

    #[test]
    fn test_bookings_renders_rows() {
        let bookings = vec![make_booking("ZC-1", Some("Pune")), make_booking("ZC-2", None)];
        let content = render(&bookings, 0, 120, 30);

        assert!(content.contains("Bookings (2)"));
        assert!(content.contains("CUSTOMER"));
        assert!(content.contains("ZC-1"));
        assert!(content.contains("Mumbai → Pune"));
        assert!(content.contains("₹1,850"));
    }

    #[test]
    fn test_bookings_scroll_skips_rows() {
        let bookings = vec![make_booking("ZC-1", None), make_booking("ZC-2", None)];
        let content = render(&bookings, 1, 120, 30);

        assert!(!content.contains("ZC-1"));
        assert!(content.contains("ZC-2"));
    }

    #[test]
    fn test_bookings_empty_state() {
        let content = render(&[], 0, 120, 30);
        assert!(content.contains("No bookings"));
    }

    #[test]
    fn test_bookings_tiny_terminal_does_not_panic() {
        let bookings = vec![make_booking("ZC-1", Some("Pune")), make_booking("ZC-2", None)];
        for (width, height) in [(10, 3), (1, 1), (120, 7), (120, 8), (120, 9), (30, 12)] {
            render(&bookings, 0, width, height);
            render(&[], 0, width, height);
        }
    }

    #[test]
    fn test_bookings_too_small_notice() {
        let content = render(&[make_booking("ZC-1", None)], 0, 40, 5);
        assert!(content.contains("Terminal too small"));
        assert!(!content.contains("ZC-1"));
    }
}
