//! # mf-core
//!
//! Shared error taxonomy and the [`Accumulator`] merge contract used by the
//! columnar, histogram and analysis crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;

pub use error::{Error, Result};
pub use traits::{Accumulator, merge_all};
