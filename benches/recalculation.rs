use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use probecalc::dataset::{Analysis, AnalysisDataset};
use probecalc::endmembers::EndmemberCalc;
use probecalc::ferric::{DroopConfig, Fe3EstimationEngine};
use probecalc::minerals::MineralPreset;
use probecalc::reference::OxideReferenceTable;
use probecalc::sites::SiteScheme;
use probecalc::stoich::{CationCheck, HeaderStyle, StoichiometryEngine};

/// Synthetic augite-like clinopyroxene analyses with a little scatter
fn generate_cpx(table: &OxideReferenceTable, n: usize) -> AnalysisDataset {
    let preset = MineralPreset::builtin("clinopyroxene").expect("built-in preset");
    let analyses: Vec<Analysis> = (0..n)
        .map(|i| {
            let d = (i % 17) as f64 * 0.05;
            Analysis::new(format!("cpx-{i}"))
                .with("SiO2", 51.5 - d)
                .with("TiO2", 0.6)
                .with("Al2O3", 3.2 + d)
                .with("Cr2O3", 0.3)
                .with("FeO", 7.8 + d)
                .with("MgO", 15.4)
                .with("MnO", 0.2)
                .with("CaO", 20.3 - d)
                .with("Na2O", 0.5)
        })
        .collect();
    preset.dataset(table, analyses).expect("valid dataset")
}

fn bench_cations(c: &mut Criterion) {
    let table = OxideReferenceTable::standard();
    let engine = StoichiometryEngine::new(&table);
    let check = CationCheck::new(4.0);
    let mut group = c.benchmark_group("cations");

    for n in [100, 1_000, 10_000] {
        let dataset = generate_cpx(&table, n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, dataset| {
            b.iter(|| {
                engine
                    .check_cations(black_box(dataset), 6.0, &check)
                    .expect("cations")
            });
        });
    }

    group.finish();
}

fn bench_droop(c: &mut Criterion) {
    let table = OxideReferenceTable::standard();
    let engine = Fe3EstimationEngine::new(&table);
    let config = DroopConfig::general(6.0, 4.0);
    let mut group = c.benchmark_group("droop");

    for n in [100, 1_000, 10_000] {
        let dataset = generate_cpx(&table, n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, dataset| {
            b.iter(|| engine.droop(black_box(dataset), &config).expect("droop"));
        });
    }

    group.finish();
}

/// Fe3+ estimate, cations, site allocation and endmembers end to end
fn bench_pipeline(c: &mut Criterion) {
    let table = OxideReferenceTable::standard();
    let dataset = generate_cpx(&table, 1_000);
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(dataset.len() as u64));

    group.bench_function("cpx_1000", |b| {
        b.iter(|| {
            let estimate = Fe3EstimationEngine::new(&table)
                .droop(black_box(&dataset), &DroopConfig::general(6.0, 4.0))
                .expect("droop");
            let formula = StoichiometryEngine::new(&table)
                .cations(estimate.dataset(), 6.0, HeaderStyle::Cation)
                .expect("cations");
            let sites = SiteScheme::CpxMorimoto.assign(&formula).expect("sites");
            let endmembers = EndmemberCalc::CpxDietrich
                .calculate(&formula)
                .expect("endmembers");
            (sites, endmembers)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cations, bench_droop, bench_pipeline);
criterion_main!(benches);
