//! Merge contract for per-chunk partial results.
//!
//! Every value a chunk hands back to the orchestrator implements
//! [`Accumulator`]. Merging must be associative and commutative so that the
//! final result does not depend on reduction order or parallelism.

use crate::Result;

/// A partial result that can be merged with another of the same schema.
pub trait Accumulator: Clone {
    /// Add `other` into `self`.
    ///
    /// Implementations validate compatibility before touching `self`: on
    /// error `self` is left exactly as it was.
    fn absorb(&mut self, other: &Self) -> Result<()>;

    /// Merge two values into a new one, leaving both operands untouched.
    fn merge(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.absorb(other)?;
        Ok(out)
    }
}

/// Fold an iterator of partial results into `init`.
pub fn merge_all<A, I>(init: A, parts: I) -> Result<A>
where
    A: Accumulator,
    I: IntoIterator<Item = A>,
{
    let mut acc = init;
    for part in parts {
        acc.absorb(&part)?;
    }
    Ok(acc)
}
