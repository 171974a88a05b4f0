//! Plain-text renderings of the derived views

use std::fmt::Write as _;

use crate::format::{format_currency, format_number, truncate};
use crate::services::DashboardStats;
use crate::types::{AnalyticsReport, Booking, Contact};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, rule());
}

/// Analytics page for one month
pub fn analytics(report: &AnalyticsReport) -> String {
    let mut out = String::new();
    let m = &report.monthly;

    let _ = writeln!(out, "Booking analytics: {}", report.month.label());
    let _ = writeln!(out, "{}", rule());
    if report.is_empty() {
        let _ = writeln!(out, "No data available");
        let _ = writeln!(out, "No bookings found for analytics");
        return out;
    }
    let _ = writeln!(out, "{:<18}{:>14}", "Total bookings", format_number(m.total_bookings));
    let _ = writeln!(out, "{:<18}{:>14}", "Total revenue", format_currency(m.total_revenue));
    let _ = writeln!(out, "{:<18}{:>14}", "Completed trips", format_number(m.completed_trips));
    let _ = writeln!(out, "{:<18}{:>14}", "Average fare", format_currency(m.average_fare));

    heading(&mut out, "Revenue by service");
    for s in &report.service_revenue {
        let _ = writeln!(
            out,
            "  {:<14}{:>8} bookings{:>16}",
            s.name,
            format_number(s.count),
            format_currency(s.total_value)
        );
    }

    heading(&mut out, "Ride status");
    for s in &report.status_counts {
        let _ = writeln!(out, "  {:<14}{:>8}", s.name, format_number(s.value));
    }

    heading(&mut out, "Car types");
    for c in &report.car_types {
        let _ = writeln!(
            out,
            "  {:<14}{:>8} bookings{:>16}",
            c.name,
            format_number(c.count),
            format_currency(c.revenue)
        );
    }

    heading(&mut out, "Top routes");
    if report.top_routes.is_empty() {
        let _ = writeln!(out, "  (no routes with a drop location)");
    }
    for (rank, r) in report.top_routes.iter().enumerate() {
        let _ = writeln!(out, "  {}. {:<40}{:>6}", rank + 1, r.route, r.count);
    }

    heading(&mut out, &format!("Daily trend ({})", report.month));
    for point in report.daily.iter().filter(|p| p.bookings > 0) {
        let _ = writeln!(
            out,
            "  {:>2}  {:>4} bookings{:>16}",
            point.day,
            point.bookings,
            format_currency(point.revenue)
        );
    }
    if report.daily.iter().all(|p| p.bookings == 0) {
        let _ = writeln!(out, "  (no bookings created this month)");
    }

    out
}

/// One line per booking
pub fn booking_table(bookings: &[&Booking]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<18} {:<10} {:<10} {:<12} {:<11} {:>10}",
        "BOOKING", "CUSTOMER", "SERVICE", "CAR", "STATUS", "JOURNEY", "FARE"
    );
    for b in bookings {
        let _ = writeln!(
            out,
            "{:<12} {:<18} {:<10} {:<10} {:<12} {:<11} {:>10}",
            b.booking_id,
            truncate(&b.user_name, 18),
            b.service_type.label(),
            b.car_type.label(),
            b.ride_status.label(),
            b.journey_date.format("%Y-%m-%d").to_string(),
            format_currency(b.estimated_fare)
        );
    }
    let _ = writeln!(out, "{} booking(s)", bookings.len());
    out
}

/// Full detail for one booking
pub fn booking_detail(b: &Booking) -> String {
    let mut out = String::new();
    let row = |out: &mut String, label: &str, value: &str| {
        let _ = writeln!(out, "{:<18}{}", label, value);
    };

    let _ = writeln!(out, "Booking {}", b.booking_id);
    let _ = writeln!(out, "{}", rule());
    row(&mut out, "Customer", &b.user_name);
    row(&mut out, "Email", &b.user_email);
    row(&mut out, "Mobile", &b.mobile_number);
    row(&mut out, "Service", &b.service_type.label());
    row(&mut out, "Car", &b.car_type.label());
    row(&mut out, "Status", &b.ride_status.label());
    row(&mut out, "Pickup", &b.pick_up_location);
    if let Some(drop) = &b.drop_location {
        row(&mut out, "Drop", drop);
    }
    row(&mut out, "Journey date", &b.journey_date.format("%Y-%m-%d").to_string());
    if let Some(time) = &b.pick_up_time {
        row(&mut out, "Pickup time", time);
    }
    if let Some(ret) = &b.return_date {
        row(&mut out, "Return date", ret);
    }
    if let Some(km) = b.km_limit {
        row(&mut out, "KM limit", &format!("{:.0}", km));
    }
    row(&mut out, "Estimated fare", &format_currency(b.estimated_fare));
    if let Some(paid) = b.advance_amount_paid {
        row(&mut out, "Advance paid", &format_currency(paid));
    }
    if let Some(discount) = b.discount_amount {
        row(&mut out, "Discount", &format_currency(discount));
    }
    if let Some(refund) = b.refund_amount {
        row(&mut out, "Refund", &format_currency(refund));
    }
    if let Some(status) = b.payment_status {
        row(&mut out, "Payment", &status.label());
    }
    if let Some(method) = &b.payment_method {
        row(&mut out, "Payment method", method);
    }
    if let Some(driver) = &b.driver_name {
        let contact = b.driver_mobile.as_deref().unwrap_or("-");
        row(&mut out, "Driver", &format!("{} ({})", driver, contact));
    }
    if let Some(vehicle) = &b.vehicle_number {
        row(&mut out, "Vehicle", vehicle);
    }
    if let Some(source) = &b.booking_source {
        row(&mut out, "Source", source);
    }
    row(
        &mut out,
        "Created",
        &b.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    out
}

/// Landing-page counters plus the recent bookings list
pub fn dashboard(stats: &DashboardStats, recent: &[&Booking]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard");
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{:<22}{:>12}", "Total bookings", format_number(stats.total_bookings));
    let _ = writeln!(out, "{:<22}{:>12}", "Today's trips", format_number(stats.today_bookings));
    let _ = writeln!(
        out,
        "{:<22}{:>12}",
        "This month revenue",
        format_currency(stats.this_month_revenue)
    );
    let _ = writeln!(out, "{:<22}{:>12}", "Pending", format_number(stats.pending_bookings));
    let _ = writeln!(out, "{:<22}{:>12}", "Active rides", format_number(stats.active_rides));
    let _ = writeln!(out, "{:<22}{:>12}", "Completed", format_number(stats.completed_bookings));
    let _ = writeln!(out, "{:<22}{:>12}", "Contact messages", format_number(stats.total_contacts));

    heading(&mut out, "Recent bookings");
    if recent.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for b in recent {
        let _ = writeln!(
            out,
            "  {:<12} {:<18} {:<12} {:>10}",
            b.booking_id,
            truncate(&b.user_name, 18),
            b.ride_status.label(),
            format_currency(b.estimated_fare)
        );
    }
    out
}

pub fn contact_list(contacts: &[&Contact]) -> String {
    let mut out = String::new();
    for c in contacts {
        let _ = writeln!(
            out,
            "{}  {} <{}> {}",
            c.created_at.format("%Y-%m-%d"),
            c.name,
            c.email,
            c.phone
        );
        let _ = writeln!(out, "  {}", c.subject);
        let _ = writeln!(out, "  {}\n", c.message);
    }
    let _ = writeln!(out, "{} message(s)", contacts.len());
    out
}
