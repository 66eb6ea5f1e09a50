//! Length policies shared by the snapshot builders.

/// Number of rows usable from a set of parallel sequences, capped at `max`.
///
/// A short sequence silently limits the others.
pub fn clamp_len(max: usize, lens: &[usize]) -> usize {
    lens.iter().copied().fold(max, usize::min)
}

/// Drop everything past the first `max` entries.
pub fn take_clamped<T>(mut items: Vec<T>, max: usize) -> Vec<T> {
    items.truncate(max);
    items
}
