//! 📊 Leaderboard benchmarks: parse, count, rank.
//!
//! A synthetic day with a skewed song distribution, so some groups have a
//! long tail and the top-K selection has real work to do.

use std::collections::HashMap;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hitlist::PlayEvent;
use hitlist::leaderboards::{ByCountry, ByListener, DEFAULT_LEADERBOARD_SIZE, PlayCounts, top_k};
use hitlist::parser::parse_line;

const COUNTRIES: [&str; 8] = ["FR", "DE", "BE", "NL", "ES", "IT", "PT", "GB"];

fn synthetic_lines(count: u64) -> Vec<String> {
    (0..count)
        .map(|i| {
            // 🎲 cheap deterministic scramble, squared to skew towards low song ids
            let mixed = i.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 40;
            let song = (mixed % 4_000) * (mixed % 4_000) / 4_000 + 1;
            let listener = mixed % 20_000 + 1;
            let country = COUNTRIES[(mixed % COUNTRIES.len() as u64) as usize];
            format!("{song}|{listener}|{country}")
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let lines = synthetic_lines(100_000);
    let mut group = c.benchmark_group("parse_line");
    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("100k_valid_lines", |b| {
        b.iter(|| {
            lines
                .iter()
                .filter(|line| parse_line(black_box(line)).is_ok())
                .count()
        })
    });
    group.finish();
}

fn bench_count_and_rank(c: &mut Criterion) {
    let events: Vec<PlayEvent> = synthetic_lines(200_000)
        .iter()
        .filter_map(|line| parse_line(line).ok())
        .collect();

    let mut group = c.benchmark_group("count_and_rank");
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("by_country", |b| {
        b.iter(|| {
            let mut counts = PlayCounts::<ByCountry>::new();
            counts.record_all(black_box(&events));
            counts.into_leaderboards(DEFAULT_LEADERBOARD_SIZE)
        })
    });
    group.bench_function("by_listener", |b| {
        b.iter(|| {
            let mut counts = PlayCounts::<ByListener>::new();
            counts.record_all(black_box(&events));
            counts.into_leaderboards(DEFAULT_LEADERBOARD_SIZE)
        })
    });
    group.finish();
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");
    for distinct_songs in [50u64, 5_000, 500_000] {
        let songs: HashMap<u64, u64> = (1..=distinct_songs)
            .map(|song_id| (song_id, song_id.wrapping_mul(2_654_435_761) % 997 + 1))
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(distinct_songs),
            &songs,
            |b, songs| b.iter(|| top_k(songs.clone(), DEFAULT_LEADERBOARD_SIZE)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_count_and_rank, bench_top_k);
criterion_main!(benches);
