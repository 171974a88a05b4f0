//! Criterion benchmarks for booking analytics

use std::hint::black_box;
use std::sync::Arc;

use cabdash::services::{AnalyticsCache, Aggregator, BookingFilter};
use cabdash::types::{Booking, CarType, RideStatus, ServiceType, YearMonth};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const CITIES: [&str; 6] = ["Mumbai", "Pune", "Delhi", "Agra", "Bengaluru", "Mysuru"];

/// Deterministic bookings spread over roughly a year
fn synthetic_bookings(count: usize) -> Vec<Booking> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let created_at = start + Duration::hours((i * 7 % 8760) as i64);
            Booking {
                id: i as u64,
                booking_id: format!("ZC-{:06}", i),
                user_name: format!("Customer {}", i % 500),
                service_type: ServiceType::ALL[i % ServiceType::ALL.len()],
                car_type: CarType::ALL[i % CarType::ALL.len()],
                ride_status: RideStatus::ALL[i % RideStatus::ALL.len()],
                pick_up_location: CITIES[i % CITIES.len()].to_string(),
                drop_location: (i % 4 != 0).then(|| CITIES[(i / 3) % CITIES.len()].to_string()),
                journey_date: created_at.date_naive() + Duration::days(3),
                estimated_fare: 500.0 + (i % 40) as f64 * 75.0,
                created_at,
                ..Booking::default()
            }
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let month: YearMonth = "2024-06".parse().unwrap();
    let mut group = c.benchmark_group("aggregator");

    for size in [1_000usize, 10_000, 100_000] {
        let bookings = synthetic_bookings(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("analyze", size), &bookings, |b, bookings| {
            b.iter(|| Aggregator::analyze(black_box(bookings), month));
        });
    }

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let month: YearMonth = "2024-06".parse().unwrap();
    let bookings: Arc<[Booking]> = synthetic_bookings(100_000).into();
    let mut cache = AnalyticsCache::new();
    cache.get(&bookings, month);

    c.bench_function("aggregator/cache_hit", |b| {
        b.iter(|| {
            black_box(cache.get(&bookings, month));
        });
    });
}

fn bench_filter(c: &mut Criterion) {
    let bookings = synthetic_bookings(100_000);
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let filter = BookingFilter {
        search: Some("pune".into()),
        status: Some(RideStatus::Confirmed),
        ..BookingFilter::default()
    };

    let mut group = c.benchmark_group("filter");
    group.throughput(Throughput::Elements(bookings.len() as u64));
    group.bench_function("search_and_status", |b| {
        b.iter(|| filter.apply(black_box(&bookings), today).len());
    });
    group.finish();
}

criterion_group!(benches, bench_analyze, bench_cache_hit, bench_filter);
criterion_main!(benches);
