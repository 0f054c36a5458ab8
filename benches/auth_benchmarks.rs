use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shopfront::auth::{generate_verification_token, hash_token, SessionManager};
use shopfront::config::SessionConfig;

fn bench_token_primitives(c: &mut Criterion) {
    let issued = generate_verification_token();

    c.bench_function("hash_token", |b| {
        b.iter(|| hash_token(black_box(&issued.secret)))
    });

    c.bench_function("generate_verification_token", |b| {
        b.iter(generate_verification_token)
    });
}

fn bench_session_operations(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime builds");
    let manager = SessionManager::new(&SessionConfig {
        secret: "bench-secret".to_string(),
        ..SessionConfig::default()
    });
    let credential = rt.block_on(manager.create_session("bench-user"));

    c.bench_function("session_resolve", |b| {
        b.iter(|| rt.block_on(manager.get_session(black_box(&credential))))
    });

    c.bench_function("session_create_and_clear", |b| {
        b.iter(|| {
            rt.block_on(async {
                let credential = manager.create_session("bench-user").await;
                manager.clear_session(&credential).await;
            })
        })
    });
}

criterion_group!(benches, bench_token_primitives, bench_session_operations);
criterion_main!(benches);
