//! In-process chunk runner: parallel per-chunk processing + tree reduction.

use rayon::prelude::*;

use mf_core::{Accumulator, Error, Result};

use crate::chunk::MuonChunk;
use crate::output::AnalysisOutput;
use crate::processor::DimuonProcessor;

/// Result of [`run_chunks_lenient`].
#[derive(Debug)]
pub struct RunSummary {
    /// Merged output of every successful chunk.
    pub output: AnalysisOutput,
    /// Number of chunks merged into `output`.
    pub processed: usize,
    /// Index and error of every failed chunk.
    pub failed: Vec<(usize, Error)>,
}

/// Process all chunks in parallel and merge their outputs.
///
/// The first chunk error aborts the run; no partial result is returned.
pub fn run_chunks(processor: &DimuonProcessor, chunks: &[MuonChunk]) -> Result<AnalysisOutput> {
    chunks.par_iter().map(|chunk| processor.process(chunk)).try_reduce(
        || processor.identity(),
        |mut acc, part| {
            acc.absorb(&part)?;
            Ok(acc)
        },
    )
}

/// Process all chunks in parallel, skipping the ones that fail.
///
/// A failed chunk contributes nothing to the merged output; its index and
/// error are reported in [`RunSummary::failed`].
pub fn run_chunks_lenient(
    processor: &DimuonProcessor,
    chunks: &[MuonChunk],
) -> Result<RunSummary> {
    let results: Vec<Result<AnalysisOutput>> =
        chunks.par_iter().map(|chunk| processor.process(chunk)).collect();

    let mut output = processor.identity();
    let mut processed = 0;
    let mut failed = Vec::new();
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(part) => {
                output.absorb(&part)?;
                processed += 1;
            }
            Err(e) => {
                tracing::warn!(
                    chunk = i,
                    dataset = %chunks[i].dataset,
                    error = %e,
                    "chunk skipped"
                );
                failed.push((i, e));
            }
        }
    }
    tracing::info!(processed, failed = failed.len(), "chunk run complete");
    Ok(RunSummary { output, processed, failed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::MUON_FIELDS;

    fn single_muon_chunk(dataset: &str, pt: f64) -> MuonChunk {
        let mut c = MuonChunk::new(dataset).with_counts(vec![1]);
        for f in MUON_FIELDS {
            let v = match f {
                "pt" => pt,
                "isGlobal" | "softId" => 1.0,
                "pfRelIso04_all" => 0.1,
                _ => 0.0,
            };
            c = c.with_column(f, vec![v]);
        }
        c
    }

    #[test]
    fn parallel_run_matches_sequential_merge() {
        let p = DimuonProcessor::new().unwrap();
        let chunks: Vec<_> = (0..16)
            .map(|i| single_muon_chunk(if i % 2 == 0 { "A" } else { "B" }, 4.0 + i as f64))
            .collect();

        let parallel = run_chunks(&p, &chunks).unwrap();
        let mut sequential = p.identity();
        for c in &chunks {
            sequential.absorb(&p.process(c).unwrap()).unwrap();
        }
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.cutflow.get("all events"), Some(16));
        assert_eq!(parallel.histograms.get("muon_pt").unwrap().total("A"), 8);
    }

    #[test]
    fn strict_run_fails_on_bad_chunk() {
        let p = DimuonProcessor::new().unwrap();
        let mut bad = single_muon_chunk("A", 5.0);
        bad.columns.remove("z");
        let chunks = vec![single_muon_chunk("A", 5.0), bad];
        assert_eq!(run_chunks(&p, &chunks).unwrap_err(), Error::MissingField("z".into()));
    }

    #[test]
    fn lenient_run_excludes_bad_chunk() {
        let p = DimuonProcessor::new().unwrap();
        let mut bad = single_muon_chunk("A", 5.0);
        bad.n_muon = vec![2];
        let chunks = vec![single_muon_chunk("A", 5.0), bad, single_muon_chunk("A", 6.0)];
        let summary = run_chunks_lenient(&p, &chunks).unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, 1);
        assert!(matches!(summary.failed[0].1, Error::Shape(_)));
        assert_eq!(summary.output.cutflow.get("all events"), Some(2));
    }

    #[test]
    fn no_chunks_gives_identity() {
        let p = DimuonProcessor::new().unwrap();
        assert_eq!(run_chunks(&p, &[]).unwrap(), p.identity());
    }
}
