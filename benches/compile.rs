//! Compilation benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use netflux_ode::network::{matrix, NetworkSheet, ReactionRow, SpeciesRow};
use netflux_ode::NetworkCompiler;

/// Layered network: each species is driven by the two before it, one of
/// them negated, plus an input on every tenth species
fn layered_sheet(n_species: usize) -> NetworkSheet {
    let ids: Vec<String> = (0..n_species).map(|k| format!("S{}", k)).collect();
    let mut rules = vec![format!("=> {}", ids[0])];
    for k in 1..n_species {
        if k >= 2 {
            rules.push(format!("{} & !{} => {}", ids[k - 1], ids[k - 2], ids[k]));
        } else {
            rules.push(format!("{} => {}", ids[k - 1], ids[k]));
        }
        if k % 10 == 0 {
            rules.push(format!("=> {}", ids[k]));
        }
    }

    NetworkSheet {
        species: ids.iter().map(|id| SpeciesRow::new(id, 0.0, 1.0, 1.0)).collect(),
        reactions: rules
            .iter()
            .enumerate()
            .map(|(i, rule)| ReactionRow::new(&format!("r{}", i), rule, 1.0, 1.4, 0.5))
            .collect(),
    }
}

fn bench_matrix_build(c: &mut Criterion) {
    let sheet = layered_sheet(200);
    let ids: Vec<&str> = sheet.species.iter().filter_map(|s| s.id.as_deref()).collect();
    let rules: Vec<&str> = sheet.reactions.iter().filter_map(|r| r.rule.as_deref()).collect();

    c.bench_function("matrix_build", |b| {
        b.iter(|| matrix::build(black_box(&ids), black_box(&rules)))
    });
}

fn bench_full_compile(c: &mut Criterion) {
    let sheet = layered_sheet(200);
    let compiler = NetworkCompiler::default();

    c.bench_function("full_compile", |b| {
        b.iter(|| compiler.compile("bench", black_box(&sheet)))
    });
}

fn bench_derivatives(c: &mut Criterion) {
    let sheet = layered_sheet(200);
    let outcome = NetworkCompiler::default().compile("bench", &sheet);
    let Some(model) = outcome.into_model() else {
        return;
    };
    let y = vec![0.5; model.system.n_species()];
    let mut dydt = vec![0.0; y.len()];

    c.bench_function("derivatives", |b| {
        b.iter(|| model.system.derivatives(black_box(&y), &mut dydt))
    });
}

criterion_group!(
    benches,
    bench_matrix_build,
    bench_full_compile,
    bench_derivatives
);
criterion_main!(benches);
