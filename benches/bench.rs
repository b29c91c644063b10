// Criterion benchmarks for Buddy Dispatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashSet;

use buddy_dispatch::core::matcher;
use buddy_dispatch::models::{AvailableBuddy, HelpRequest};
use buddy_dispatch::services::expo::is_expo_push_token;
use chrono::Utc;

fn make_buddy(id: usize) -> AvailableBuddy {
    AvailableBuddy {
        buddy_id: id as i32,
        requester_id: (id + 1000) as i32,
        push_token: format!("ExponentPushToken[device-{}]", id),
    }
}

fn make_request(id: usize) -> HelpRequest {
    HelpRequest {
        request_id: id as i32,
        requester_id: (id + 2000) as i32,
        meeting_point: format!("Meeting point {}", id),
        destination: format!("Destination {}", id),
        urgent: id % 3 == 0,
        created_at: Utc::now(),
    }
}

fn bench_token_validation(c: &mut Criterion) {
    c.bench_function("token_validation", |b| {
        b.iter(|| is_expo_push_token(black_box("ExponentPushToken[device-42]")));
    });
}

fn bench_matching(c: &mut Criterion) {
    let requests: Vec<HelpRequest> = (0..20).map(make_request).collect();
    let notified = HashSet::new();

    let mut group = c.benchmark_group("matching");

    for buddy_count in [10, 50, 100, 500, 1000].iter() {
        let buddies: Vec<AvailableBuddy> = (0..*buddy_count).map(make_buddy).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(buddy_count),
            buddy_count,
            |b, _| {
                b.iter(|| {
                    matcher::evaluate(
                        black_box(&requests),
                        black_box(&buddies),
                        &notified,
                        is_expo_push_token,
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_token_validation, bench_matching);
criterion_main!(benches);
