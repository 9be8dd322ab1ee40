//! Benchmarks for configuration resolution and profile evaluation

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use profile_qc::{ConfigCatalog, Profile, ProfileQc, load_config};

/// Synthetic cast with a thermocline and a few gaps in temperature
fn synthetic_cast(levels: usize) -> Profile {
    let pressure: Vec<f64> = (0..levels).map(|i| i as f64).collect();
    let temperature: Vec<Option<f64>> = pressure
        .iter()
        .enumerate()
        .map(|(i, p)| (i % 97 != 0).then(|| 4.0 + 22.0 * (-p / 150.0).exp()))
        .collect();
    let salinity: Vec<Option<f64>> = pressure
        .iter()
        .map(|p| Some(34.7 + 1.5 * (-p / 300.0).exp()))
        .collect();

    Profile::new()
        .with_variable("pressure", pressure)
        .with_variable("temperature", temperature)
        .with_variable("salinity", salinity)
}

fn bench_resolve(c: &mut Criterion) {
    let catalog = ConfigCatalog::builtin();
    c.bench_function("resolve_cotede", |b| {
        b.iter(|| catalog.resolve(black_box("cotede")))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let qc = match load_config("cotede").and_then(ProfileQc::new) {
        Ok(qc) => qc,
        Err(e) => panic!("cotede does not plan: {e}"),
    };
    let profile = synthetic_cast(2000);

    c.bench_function("evaluate_cotede_2000_levels", |b| {
        b.iter(|| qc.evaluate(black_box(&profile)))
    });
}

criterion_group!(benches, bench_resolve, bench_evaluate);
criterion_main!(benches);
