//! Benchmarks for numberof deduplication: structural hashing and grouping
//! cost when a model contains many counting expressions over few distinct
//! argument sets.
//!
//! Run with: `cargo bench --bench numberof`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use nlexpr::expr::{cast, NumberOfExpr};
use nlexpr::numberof::NumberOfMap;
use nlexpr::{Expr, Node, Op};

const SETS: usize = 16;
const VARS_PER_SET: usize = 4;
const VALUES: usize = 16;

fn run_benchmarks(c: &mut Criterion) {
    let vars: Vec<Node> = (0..(SETS * VARS_PER_SET) as u32).map(Node::variable).collect();
    let values: Vec<Node> = (0..VALUES).map(|v| Node::number(v as f64)).collect();

    // One expression per (argument set, counted value) pair.
    let mut exprs: Vec<Node> = Vec::with_capacity(SETS * VALUES);
    for set in 0..SETS {
        for value in 0..VALUES {
            let mut args = vec![&values[value]];
            args.extend(&vars[set * VARS_PER_SET..(set + 1) * VARS_PER_SET]);
            exprs.push(Node::iterated(Op::NumberOf, args));
        }
    }
    let handles: Vec<NumberOfExpr> = exprs
        .iter()
        .map(|n| cast(Expr::new(n)).unwrap())
        .collect();

    let mut group = c.benchmark_group("numberof map");

    group.bench_function("add distinct pairs", |b| {
        b.iter(|| {
            let mut next = 0u32;
            let mut map = NumberOfMap::new(|| {
                next += 1;
                next
            });
            for (i, &e) in handles.iter().enumerate() {
                let value = (i % VALUES) as f64;
                black_box(map.add(value, e));
            }
            black_box(map.len())
        })
    });

    group.bench_function("add repeated pairs", |b| {
        let repeats = 8;
        b.iter(|| {
            let mut next = 0u32;
            let mut map = NumberOfMap::new(|| {
                next += 1;
                next
            });
            for _ in 0..repeats {
                for (i, &e) in handles.iter().enumerate() {
                    let value = (i % VALUES) as f64;
                    black_box(map.add(value, e));
                }
            }
            black_box(map.len())
        })
    });

    group.finish();
}

criterion_group!(benches, run_benchmarks);
criterion_main!(benches);
