//! # mf-columnar
//!
//! Ragged (jagged) columnar containers for per-event object collections.
//!
//! Every container stores one flat value buffer per column plus an
//! [`EventLayout`] (per-event counts and their prefix-sum offsets). Cuts are
//! expressed as [`Mask`]s with the same layout; filtering always returns a new
//! container and keeps every column of a [`RecordArray`] aligned.
//!
//! ## Example
//!
//! ```
//! use mf_columnar::{RecordArray, distinct_pairs};
//!
//! let muons = RecordArray::from_counts(
//!     &[2, 0, 1],
//!     [("pt", vec![10.0, 2.0, 7.5]), ("charge", vec![1.0, -1.0, 1.0])],
//! )
//! .unwrap();
//!
//! let hard = muons.filter(&muons.field("pt").unwrap().gt(3.0)).unwrap();
//! assert_eq!(hard.counts(), &[1, 0, 1]);
//!
//! let pairs = distinct_pairs(&muons);
//! assert_eq!(pairs.counts(), &[1, 0, 0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod layout;
pub mod pairs;
pub mod ragged;
pub mod record;

pub use layout::EventLayout;
pub use pairs::{PairRecord, PairSide, cartesian_pairs, distinct_pairs};
pub use ragged::{Mask, RaggedArray};
pub use record::{FieldView, RecordArray};
