use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mf_analysis::{DimuonProcessor, MUON_FIELDS, MuonChunk, combine, run_chunks};
use std::hint::black_box;

/// Deterministic synthetic chunk: `n_events` events with 0..=4 muons each.
fn make_chunk(n_events: usize, seed: usize) -> MuonChunk {
    let counts: Vec<i64> = (0..n_events).map(|i| ((i * 7 + seed) % 5) as i64).collect();
    let n: usize = counts.iter().sum::<i64>() as usize;
    let mut c = MuonChunk::new("DoubleMuon").with_counts(counts);
    for (k, field) in MUON_FIELDS.iter().enumerate() {
        let values = (0..n)
            .map(|i| {
                let x = ((i * 31 + k * 17 + seed) % 1000) as f64 / 1000.0;
                match *field {
                    "pt" => 2.0 + 40.0 * x,
                    "eta" => -2.8 + 5.6 * x,
                    "phi" => -3.1 + 6.2 * x,
                    "mass" => 0.1057,
                    "charge" => if i % 2 == 0 { 1.0 } else { -1.0 },
                    "isGlobal" | "softId" => if x > 0.1 { 1.0 } else { 0.0 },
                    "vtxIdx" => (i % 3) as f64 - 1.0,
                    "pfRelIso04_all" => x,
                    "z" => x - 0.5,
                    _ => 0.0,
                }
            })
            .collect();
        c = c.with_column(*field, values);
    }
    c
}

fn bench_process(c: &mut Criterion) {
    let p = DimuonProcessor::new().unwrap();
    let mut group = c.benchmark_group("dimuon_process");
    for n in [1_000usize, 10_000, 100_000] {
        let chunk = make_chunk(n, 3);
        group.bench_with_input(BenchmarkId::new("chunk", n), &chunk, |b, chunk| {
            b.iter(|| black_box(p.process(chunk).unwrap()))
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let p = DimuonProcessor::new().unwrap();
    let a = p.process(&make_chunk(5_000, 1)).unwrap();
    let b = p.process(&make_chunk(5_000, 2)).unwrap();
    c.bench_function("combine_outputs", |bench| bench.iter(|| black_box(combine(&a, &b).unwrap())));

    let chunks: Vec<_> = (0..32).map(|s| make_chunk(5_000, s)).collect();
    c.bench_function("run_chunks_32x5k", |bench| {
        bench.iter(|| black_box(run_chunks(&p, &chunks).unwrap()))
    });
}

criterion_group!(benches, bench_process, bench_merge);
criterion_main!(benches);
