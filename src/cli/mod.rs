mod report;

use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::logging;
use crate::services::dashboard::RECENT_BOOKINGS;
use crate::services::{
    recent_bookings, search_contacts, Aggregator, BookingFilter, DashboardStats, DataLoaderService,
    DateFilter,
};
use crate::tui;
use crate::types::{
    Booking, BookingUpdate, CarType, PaymentStatus, RideStatus, ServiceType, YearMonth,
};

/// Terminal admin dashboard and booking analytics for cab-booking backends
#[derive(Parser, Debug)]
#[command(name = "cabdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config file and CABDASH_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Read bookings from a saved JSON snapshot instead of the backend
    #[arg(long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Show booking analytics for a month
    Analytics {
        /// Month to analyze (defaults to the current month)
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<YearMonth>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List bookings, optionally filtered
    Bookings(BookingsArgs),

    /// Show a single booking
    Show {
        #[arg(value_name = "BOOKING_ID")]
        booking_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a booking's status, payment or driver assignment
    Update(UpdateArgs),

    /// Show landing-page counters and recent bookings
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List contact-form messages
    Contacts {
        /// Match name, email, phone, subject or message
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the backend is reachable
    Health,
}

/// Booking list filters
#[derive(Args, Debug)]
struct BookingsArgs {
    /// Match booking id, customer, email, mobile or locations
    #[arg(long)]
    search: Option<String>,

    /// pending, confirmed, in_progress, completed or cancelled
    #[arg(long)]
    status: Option<RideStatus>,

    /// oneway, roundtrip, airport or rental
    #[arg(long = "service")]
    service_type: Option<ServiceType>,

    /// hatchback, sedan, suv, crysta or scorpio
    #[arg(long = "car")]
    car_type: Option<CarType>,

    /// pending, paid or failed
    #[arg(long = "payment")]
    payment_status: Option<PaymentStatus>,

    /// all, today, tomorrow, this_week or created_today
    #[arg(long, default_value = "all")]
    date: DateFilter,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl BookingsArgs {
    fn filter(&self) -> BookingFilter {
        BookingFilter {
            search: self.search.clone(),
            status: self.status,
            service_type: self.service_type,
            car_type: self.car_type,
            payment_status: self.payment_status,
            date: self.date,
        }
    }
}

/// Booking edit
#[derive(Args, Debug)]
struct UpdateArgs {
    #[arg(value_name = "BOOKING_ID")]
    booking_id: String,

    #[command(flatten)]
    fields: UpdateFields,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Editable booking fields; at least one is required
#[derive(Args, Debug)]
#[group(required = true, multiple = true)]
struct UpdateFields {
    /// New ride status
    #[arg(long)]
    status: Option<RideStatus>,

    /// New payment status
    #[arg(long)]
    payment: Option<PaymentStatus>,

    #[arg(long, value_name = "METHOD")]
    payment_method: Option<String>,

    #[arg(long, value_name = "NAME")]
    driver_name: Option<String>,

    #[arg(long, value_name = "MOBILE")]
    driver_mobile: Option<String>,

    /// Vehicle registration number
    #[arg(long, value_name = "NUMBER")]
    vehicle: Option<String>,

    /// Advance amount paid, in rupees
    #[arg(long, value_name = "AMOUNT", value_parser = parse_amount)]
    advance: Option<f64>,
}

impl UpdateFields {
    fn update(&self) -> BookingUpdate {
        BookingUpdate {
            ride_status: self.status,
            payment_status: self.payment,
            payment_method: self.payment_method.clone(),
            driver_name: self.driver_name.clone(),
            driver_mobile: self.driver_mobile.clone(),
            vehicle_number: self.vehicle.clone(),
            advance_amount_paid: self.advance,
        }
    }
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("'{}' must be a non-negative amount", s));
    }
    Ok(amount)
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let is_tui = matches!(self.command, None | Some(Commands::Tui));

        let _log_guard = if is_tui {
            Config::data_dir()
                .ok()
                .and_then(|dir| logging::init_file(&dir.join("logs")))
        } else {
            logging::init_stderr();
            None
        };

        let config = Config::load()?.with_overrides(self.api_url, self.timeout)?;
        tracing::debug!(api_url = %config.api_url, input = ?self.input, "configuration resolved");

        let loader = DataLoaderService::from_config(&config, self.input)?;
        let today = Local::now().date_naive();

        match self.command.unwrap_or(Commands::Tui) {
            Commands::Tui => tui::run(loader),
            Commands::Analytics { month, json } => {
                let bookings = loader.load_bookings().records;
                let analytics = Aggregator::analyze(&bookings, month.unwrap_or_default());
                emit(json, &analytics, || report::analytics(&analytics))
            }
            Commands::Bookings(args) => {
                let bookings = loader.load_bookings().records;
                let matched = args.filter().apply(&bookings, today);
                emit(args.json, &matched, || report::booking_table(&matched))
            }
            Commands::Show { booking_id, json } => {
                let booking = loader.get_booking(&booking_id)?;
                emit(json, &booking, || report::booking_detail(&booking))
            }
            Commands::Update(args) => {
                let booking = loader.update_booking(&args.booking_id, &args.fields.update())?;
                emit(args.json, &booking, || report::booking_detail(&booking))
            }
            Commands::Dashboard { json } => {
                let bookings = loader.load_bookings().records;
                let contacts = loader.load_contacts().records;
                let stats = DashboardStats::compute(&bookings, contacts.len(), today);
                let recent = recent_bookings(&bookings, RECENT_BOOKINGS);
                let summary = DashboardJson {
                    stats: &stats,
                    recent_bookings: &recent,
                };
                emit(json, &summary, || report::dashboard(&stats, &recent))
            }
            Commands::Contacts { search, json } => {
                let contacts = loader.load_contacts().records;
                let matched = search_contacts(&contacts, search.as_deref().unwrap_or(""));
                emit(json, &matched, || report::contact_list(&matched))
            }
            Commands::Health => {
                let health = loader.health()?;
                println!("{}: {}", loader.source(), health.status);
                Ok(())
            }
        }
    }
}

#[derive(Serialize)]
struct DashboardJson<'a> {
    stats: &'a DashboardStats,
    recent_bookings: &'a [&'a Booking],
}

fn emit<T, F>(json: bool, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        print_json(value)
    } else {
        print!("{}", text());
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
