// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for view derivation

use concept_atlas::prelude::*;
use concept_atlas::scaling::CharWidthEstimate;
use concept_atlas::wheel::{rank_edges, RelatedEdge};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Synthetic dataset: a chain-shaped spanning tree, a balanced prominence tree
fn dataset(n: usize) -> Dataset {
    let themes: Vec<Theme> = (0..8)
        .map(|t| Theme {
            id: format!("t{t}"),
            name: None,
            hue: None,
            connectivity: f64::from(t),
        })
        .collect();

    let concepts: Vec<Concept> = (0..n)
        .map(|i| {
            let angle = i as f64 * 0.37;
            let mut c = Concept::new(
                i.to_string(),
                format!("concept{i}"),
                1.0 + (i * 7 % 97) as f64,
                Position {
                    u: angle.cos() * 0.9,
                    v: angle.sin() * 0.9,
                },
            );
            c.theme_id = Some(format!("t{}", i % 8));
            if i + 1 < n {
                c.mst_edges.push(MstEdge { to: (i + 1).to_string() });
            }
            c.related = (1..6)
                .map(|k| RelatedLink {
                    target_id: ((i + k * 13) % n).to_string(),
                    strength: 0.1 * k as f64,
                    count: k as u64,
                    prominence: ((i * k) % 31) as f64,
                })
                .collect();
            c
        })
        .collect();

    let prominence = (1..n)
        .map(|i| ProminenceEdge {
            from: ((i - 1) / 2).to_string(),
            to: i.to_string(),
            weight: 1.0 / i as f64,
        })
        .collect();

    Dataset::from_parts(concepts, themes, prominence).unwrap()
}

fn bench_derive_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_views");
    let params = LayoutParams::default();
    let measure = CharWidthEstimate::default();

    for n in [50, 200, 800] {
        let ds = dataset(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &ds, |b, ds| {
            b.iter(|| derive_views(black_box(ds), &params, &measure).unwrap());
        });
    }
    group.finish();
}

fn bench_rank_edges(c: &mut Criterion) {
    let edges: Vec<RelatedEdge> = (0..5000)
        .map(|i| RelatedEdge {
            source_id: i.to_string(),
            target_id: (i + 1).to_string(),
            source_name: format!("s{i}"),
            target_name: format!("t{i}"),
            prominence: f64::from((i * 7919) % 1000),
            strength: 0.5,
            count: 1,
        })
        .collect();

    c.bench_function("rank_edges_5000_to_200", |b| {
        b.iter(|| rank_edges(black_box(edges.clone()), 200));
    });
}

criterion_group!(benches, bench_derive_views, bench_rank_edges);
criterion_main!(benches);
