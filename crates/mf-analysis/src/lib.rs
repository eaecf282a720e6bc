//! # mf-analysis
//!
//! Per-chunk dimuon selection: muon quality cuts with a cutflow, opposite-charge
//! same-vertex pair building, and histogram booking per dataset. Chunk outputs
//! are [`AnalysisOutput`] values merged with [`combine`].
//!
//! ## Example
//!
//! ```
//! use mf_analysis::{DimuonProcessor, MuonChunk, MUON_FIELDS};
//!
//! let mut chunk = MuonChunk::new("DoubleMuon").with_counts(vec![0, 0]);
//! for field in MUON_FIELDS {
//!     chunk = chunk.with_column(field, Vec::new());
//! }
//!
//! let processor = DimuonProcessor::new().unwrap();
//! let out = processor.process(&chunk).unwrap();
//! assert_eq!(out.cutflow.get("all events"), Some(2));
//! assert_eq!(out.histograms.grand_total(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod chunk;
pub mod config;
pub mod kinematics;
pub mod output;
pub mod processor;
pub mod runner;

pub use book::{HISTOGRAMS, HistogramDef, book_histograms};
pub use chunk::{MUON_FIELDS, MuonChunk};
pub use config::SelectionConfig;
pub use kinematics::{LorentzVector, candidate_p4};
pub use output::{AnalysisOutput, combine};
pub use processor::{DimuonProcessor, STAGES};
pub use runner::{RunSummary, run_chunks, run_chunks_lenient};
