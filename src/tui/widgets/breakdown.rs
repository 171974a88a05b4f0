//! Breakdown view - revenue by service, ride status, car types and top routes

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::analytics::month_title;
use super::tabs::Tab;
use super::{bar, centered_content, render_chrome, StatusLine};
use crate::format::{format_currency, format_number, truncate};
use crate::tui::theme::Theme;
use crate::types::AnalyticsReport;

const KEYBINDINGS: &[(&str, &str)] = &[
    ("←→", "Month"),
    ("Tab", "Switch view"),
    ("r", "Reload"),
    ("?", "Help"),
    ("q", "Quit"),
];

const NAME_WIDTH: usize = 12;
const BAR_WIDTH: usize = 14;
const ROUTE_WIDTH: usize = 36;

/// One labelled row of a section
#[derive(Debug, Clone, PartialEq)]
struct Row {
    name: String,
    value: f64,
    detail: String,
}

/// Breakdown view widget
pub struct BreakdownView<'a> {
    report: &'a AnalyticsReport,
    status: &'a StatusLine,
    theme: Theme,
}

impl<'a> BreakdownView<'a> {
    pub fn new(report: &'a AnalyticsReport, status: &'a StatusLine, theme: Theme) -> Self {
        Self {
            report,
            status,
            theme,
        }
    }

    fn service_rows(&self) -> Vec<Row> {
        self.report
            .service_revenue
            .iter()
            .map(|s| Row {
                name: s.name.clone(),
                value: s.total_value,
                detail: format!("{:>5}  {:>10}", s.count, format_currency(s.total_value)),
            })
            .collect()
    }

    fn status_rows(&self) -> Vec<Row> {
        self.report
            .status_counts
            .iter()
            .map(|s| Row {
                name: s.name.clone(),
                value: s.value as f64,
                detail: format!("{:>5}", format_number(s.value)),
            })
            .collect()
    }

    fn car_rows(&self) -> Vec<Row> {
        self.report
            .car_types
            .iter()
            .map(|c| Row {
                name: c.name.clone(),
                value: c.revenue,
                detail: format!("{:>5}  {:>10}", c.count, format_currency(c.revenue)),
            })
            .collect()
    }

    fn render_section(&self, area: Rect, buf: &mut Buffer, title: &str, rows: &[Row], color: Color) {
        if area.height == 0 {
            return;
        }
        buf.set_stringn(
            area.x + 2,
            area.y,
            title,
            area.width.saturating_sub(2) as usize,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        if rows.is_empty() {
            if area.height > 1 {
                buf.set_string(
                    area.x + 2,
                    area.y + 1,
                    "No bookings",
                    Style::default().fg(self.theme.muted()),
                );
            }
            return;
        }

        let max = rows.iter().map(|r| r.value).fold(0.0, f64::max);
        for (i, row) in rows.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", row.name, width = NAME_WIDTH),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(bar(row.value, max, BAR_WIDTH), Style::default().fg(color)),
                Span::styled(
                    format!(" {}", row.detail),
                    Style::default().fg(self.theme.muted()),
                ),
            ]);
            buf.set_line(area.x, y, &line, area.width);
        }
    }

    fn render_routes(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_stringn(
            area.x + 2,
            area.y,
            "Top Routes",
            area.width.saturating_sub(2) as usize,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        if self.report.top_routes.is_empty() {
            if area.height > 1 {
                buf.set_string(
                    area.x + 2,
                    area.y + 1,
                    "No routes with a drop location",
                    Style::default().fg(self.theme.muted()),
                );
            }
            return;
        }

        for (i, route) in self.report.top_routes.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled(
                    format!("  {}. ", i + 1),
                    Style::default().fg(self.theme.muted()),
                ),
                Span::styled(
                    format!("{:<width$}", truncate(&route.route, ROUTE_WIDTH), width = ROUTE_WIDTH),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(
                    format!("{:>4}", route.count),
                    Style::default().fg(self.theme.text()),
                ),
            ]);
            buf.set_line(area.x, y, &line, area.width);
        }
    }
}

impl Widget for BreakdownView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = centered_content(area);
        let title = month_title(self.report);
        let body = render_chrome(
            area,
            buf,
            Tab::Breakdown,
            self.theme,
            &title,
            self.status,
            KEYBINDINGS,
        );
        if body.is_empty() {
            return;
        }

        let columns =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(body);

        let section_height = |rows: usize| Constraint::Length(rows.max(1) as u16 + 2);

        let services = self.service_rows();
        let cars = self.car_rows();
        let left = Layout::vertical([
            section_height(services.len()),
            section_height(cars.len()),
            Constraint::Min(0),
        ])
        .split(columns[0]);

        let statuses = self.status_rows();
        let right = Layout::vertical([
            section_height(statuses.len()),
            section_height(self.report.top_routes.len()),
            Constraint::Min(0),
        ])
        .split(columns[1]);

        self.render_section(left[0], buf, "Revenue by Service", &services, self.theme.money());
        self.render_section(left[1], buf, "Car Types", &cars, self.theme.stat_blue());
        self.render_section(right[0], buf, "Ride Status", &statuses, self.theme.bar());
        self.render_routes(right[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Aggregator;
    use crate::types::{Booking, RideStatus, ServiceType, YearMonth};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_booking(service: ServiceType, status: RideStatus, drop: Option<&str>) -> Booking {
        Booking {
            service_type: service,
            ride_status: status,
            pick_up_location: "Mumbai".into(),
            drop_location: drop.map(String::from),
            journey_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            estimated_fare: 1000.0,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            ..Booking::default()
        }
    }

    fn report() -> AnalyticsReport {
        let bookings = vec![
            make_booking(ServiceType::Oneway, RideStatus::Completed, Some("Pune")),
            make_booking(ServiceType::Oneway, RideStatus::Pending, Some("Pune")),
            make_booking(ServiceType::Airport, RideStatus::Cancelled, None),
        ];
        let month: YearMonth = "2024-03".parse().unwrap();
        Aggregator::analyze(&bookings, month)
    }

    #[test]
    fn test_rows_follow_report_order() {
        let report = report();
        let status = StatusLine::default();
        let view = BreakdownView::new(&report, &status, Theme::Dark);

        let names: Vec<String> = view.service_rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Oneway", "Airport"]);

        let statuses: Vec<String> = view.status_rows().into_iter().map(|r| r.name).collect();
        assert_eq!(statuses, vec!["Pending", "Completed", "Cancelled"]);
    }

    #[test]
    fn test_breakdown_renders_sections() {
        let report = report();
        let status = StatusLine::default();
        let area = Rect::new(0, 0, 120, 30);
        let mut buf = Buffer::empty(area);
        BreakdownView::new(&report, &status, Theme::Dark).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Revenue by Service"));
        assert!(content.contains("Ride Status"));
        assert!(content.contains("Car Types"));
        assert!(content.contains("Top Routes"));
        assert!(content.contains("Mumbai → Pune"));
    }

    #[test]
    fn test_breakdown_empty_report() {
        let month: YearMonth = "2024-03".parse().unwrap();
        let report = Aggregator::analyze(&[], month);
        let status = StatusLine::default();
        let area = Rect::new(0, 0, 120, 30);
        let mut buf = Buffer::empty(area);
        BreakdownView::new(&report, &status, Theme::Dark).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("No bookings"));
        assert!(content.contains("No routes with a drop location"));
    }

    #[test]
    fn test_breakdown_tiny_terminal_does_not_panic() {
        let report = report();
        let status = StatusLine::default();
        for (width, height) in [(10, 3), (1, 1), (120, 7), (120, 8), (120, 9), (30, 12)] {
            let area = Rect::new(0, 0, width, height);
            let mut buf = Buffer::empty(area);
            BreakdownView::new(&report, &status, Theme::Dark).render(area, &mut buf);
        }
    }
}
