use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use fib_twenty_fourty_eight::{
    Board, Cell, Direction, Engine, GameConfig,
    board::test_utils,
    engine::ManualClock,
    merge,
};
use itertools::Itertools as _;
use rand::{SeedableRng as _, rngs::StdRng};

/// Generate a vector of random boards for benchmarking.
fn generate_boards(count: usize) -> Vec<[[u32; 4]; 4]> {
    (0..=16)
        .cartesian_product(0..count)
        .map(|(filled, _)| test_utils::generate_random_board::<4>(filled, 12))
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    const COUNT: usize = 100;

    let mut group = c.benchmark_group("merge");

    let lines = generate_boards(COUNT)
        .into_iter()
        .flatten()
        .map(|row| row.map(Cell::from))
        .collect_vec();

    group.throughput(Throughput::Elements(lines.len() as u64));

    group.bench_function("line", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(merge::merge(line, 1));
            }
        });
    });
}

fn bench_move(c: &mut Criterion) {
    const COUNT: usize = 20;

    let mut group = c.benchmark_group("move");

    let boards = generate_boards(COUNT);
    group.throughput(Throughput::Elements((boards.len() * 4) as u64));

    group.bench_function("perform_move", |b| {
        b.iter(|| {
            for rows in &boards {
                for direction in Direction::ALL {
                    let mut engine = Engine::new(
                        GameConfig::default(),
                        (),
                        StdRng::seed_from_u64(0),
                        ManualClock::new(),
                    );
                    for (at, cell) in Board::from_rows(*rows).iter() {
                        if let Cell::Tile(value) = cell {
                            engine.insert_tile(at, value);
                        }
                    }
                    black_box(engine.perform_move(direction));
                }
            }
        });
    });
}

criterion_group!(benches, bench_merge, bench_move);
criterion_main!(benches);
