//! Benchmarks for building one round from a present roster.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use court_rotation::{Gender, Player, PlayerId, RoundOrchestrator};

fn roster(n: usize) -> Vec<Player> {
    (0..n)
        .map(|i| {
            let mut bytes = [0u8; 16];
            bytes[..8].copy_from_slice(&(i as u64).to_be_bytes());
            let mut player = Player::new(PlayerId::new(bytes), format!("P{i}"), Gender::Male, (i as u32 % 6) + 1);
            player.bench_count = (i % 3) as u32;
            player
        })
        .collect()
}

fn bench_build_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_round");

    for num_present in [4, 16, 24, 64] {
        let present = roster(num_present);

        group.bench_with_input(
            BenchmarkId::new("present", num_present),
            &num_present,
            |b, _| {
                let mut orchestrator = RoundOrchestrator::new(42);
                let mut round = 0;
                b.iter(|| {
                    let outcome = orchestrator.build_round(black_box(&present), round);
                    round += 1;
                    outcome
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build_round);
criterion_main!(benches);
