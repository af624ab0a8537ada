//! Overlap-based deduplication against already recorded time.

use crate::interval::Interval;

/// Whether `candidate` overlaps any of `existing`.
pub fn overlaps_any(existing: &[Interval], candidate: &Interval) -> bool {
    existing.iter().any(|interval| interval.overlaps(candidate))
}

/// Lazily keeps the candidates that overlap none of the existing intervals.
///
/// A candidate that overlaps an existing entry even partially is dropped
/// whole; it is never split into a remainder.
pub fn retain_new<I>(
    existing: &[Interval],
    candidates: I,
) -> impl Iterator<Item = Interval>
where
    I: IntoIterator<Item = Interval>,
{
    candidates
        .into_iter()
        .filter(move |candidate| !overlaps_any(existing, candidate))
}
