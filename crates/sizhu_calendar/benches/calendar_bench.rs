use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sizhu_calendar::lunar::{SuiLayout, new_moon_jde};
use sizhu_calendar::solar::{find_solar_longitude, solar_longitude_ut};
use sizhu_calendar::{AstronomicalCalendar, CalendarService, Gender};

fn astronomy_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("astronomy");
    group.bench_function("solar_longitude", |b| {
        b.iter(|| solar_longitude_ut(black_box(2_452_654.583)))
    });
    group.bench_function("find_start_of_spring", |b| {
        b.iter(|| find_solar_longitude(black_box(315.0), black_box(2_452_675.0)))
    });
    group.bench_function("new_moon", |b| b.iter(|| new_moon_jde(black_box(37))));
    group.bench_function("sui_layout", |b| {
        b.iter(|| SuiLayout::build(black_box(2020), 8.0))
    });
    group.finish();
}

fn service_bench(c: &mut Criterion) {
    let cal = AstronomicalCalendar::default();
    let Some(dt) = NaiveDate::from_ymd_opt(2003, 1, 15).and_then(|d| d.and_hms_opt(10, 0, 0))
    else {
        return;
    };

    let mut group = c.benchmark_group("service");
    group.bench_function("four_pillars", |b| b.iter(|| cal.four_pillars(black_box(dt))));
    group.bench_function("solar_to_lunar", |b| {
        b.iter(|| cal.solar_to_lunar(black_box(dt)))
    });
    group.bench_function("fortune_sequence", |b| {
        b.iter(|| cal.fortune_sequence(black_box(dt), Gender::Male))
    });
    group.finish();
}

criterion_group!(benches, astronomy_bench, service_bench);
criterion_main!(benches);
