// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
use RustedStability::stability::engine::StabilityEngine;
use RustedStability::stability::schemes::{SchemeDefinition, SchemeKind};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_eigenvalue_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("eigenvalue sweep");
    for scheme in SchemeKind::all() {
        let name = scheme.name();
        let mut engine = StabilityEngine::new(scheme, 200).unwrap();
        group.bench_function(name, |b| b.iter(|| black_box(engine.eigenvalues().unwrap().len())));
    }
    group.finish();
}

fn bench_parameter_update(c: &mut Criterion) {
    let scheme = SchemeKind::from_name("D1Q3 (1)").unwrap();
    let mut engine = StabilityEngine::new(scheme, 200).unwrap();
    let mut params = engine.scheme().parameters();
    c.bench_function("D1Q3 (1) fix parameters + sweep", |b| {
        b.iter(|| {
            params.insert("sa".to_string(), black_box(1.7));
            engine.fix_parameters(&params).unwrap();
            engine.eigenvalues().unwrap().len()
        })
    });
}

criterion_group!(benches, bench_eigenvalue_sweep, bench_parameter_update);
criterion_main!(benches);
