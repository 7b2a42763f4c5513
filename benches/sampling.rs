//! Benchmarks for the sampling pipeline.
//!
//! Run:
//! - cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use shadowpost::config::AppConfig;
use shadowpost::core::bins::LinearBins;
use shadowpost::model::population::PopulationParams;
use shadowpost::sim::histograms::{HistogramName, HistogramSet};
use shadowpost::sim::session::Session;

const N_ISSUES: [usize; 3] = [3, 20, 50];

fn seeded_config(n_issues: usize) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.model.n_issues = n_issues;
    cfg.sampling.seed = Some(1);
    cfg.sampling.static_users = 0;
    cfg
}

fn bench_sample_one_user(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_one_user");
    for n_issues in N_ISSUES {
        let mut session = Session::new(&seeded_config(n_issues)).expect("session");
        group.bench_with_input(BenchmarkId::from_parameter(n_issues), &n_issues, |b, _| {
            b.iter(|| black_box(session.sample_one_user()));
        });
    }
    group.finish();
}

fn bench_populate_static(c: &mut Criterion) {
    let mut group = c.benchmark_group("populate_static_2000");
    for n_issues in N_ISSUES {
        let params = PopulationParams {
            n_issues,
            ..PopulationParams::default()
        };
        let mut rng = StdRng::seed_from_u64(2);
        let mut hist = HistogramSet::new(LinearBins::new(-6.0, 6.0, 100));
        group.bench_with_input(BenchmarkId::from_parameter(n_issues), &params, |b, params| {
            b.iter(|| black_box(hist.populate_static(HistogramName::TrueAll, 2000, params, &mut rng)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sample_one_user, bench_populate_static);
criterion_main!(benches);
