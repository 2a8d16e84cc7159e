use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keydesk::auth::{decode_token, issue_token, verify_password};

fn bench_tokens(c: &mut Criterion) {
    let max_duration = chrono::Duration::hours(8);

    c.bench_function("token_issue", |b| {
        b.iter(|| issue_token(black_box("session-id"), black_box("bench-secret"), max_duration))
    });

    let token = issue_token("session-id", "bench-secret", max_duration).unwrap();
    c.bench_function("token_decode", |b| {
        b.iter(|| decode_token(black_box(&token), black_box("bench-secret")))
    });
}

fn bench_password_verify(c: &mut Criterion) {
    // Minimum bcrypt cost; at DEFAULT_COST a single verify takes ~100ms
    let digest = bcrypt::hash("benchmark-password", 4).unwrap();

    c.bench_function("password_verify_cost4", |b| {
        b.iter(|| verify_password(black_box("benchmark-password"), black_box(&digest)))
    });

    c.bench_function("password_verify_mismatch_cost4", |b| {
        b.iter(|| verify_password(black_box("wrong-password"), black_box(&digest)))
    });
}

criterion_group!(benches, bench_tokens, bench_password_verify);
criterion_main!(benches);
