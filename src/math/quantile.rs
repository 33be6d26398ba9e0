//! Order statistics with linear interpolation between closest ranks.
//!
//! For sorted values `v[0..n]` and `q ∈ [0, 1]`, the quantile is read at the
//! fractional position `h = (n - 1) q`:
//!
//! ```text
//! Q(q) = v[⌊h⌋] + (h - ⌊h⌋) (v[⌈h⌉] - v[⌊h⌋])
//! ```
//!
//! This is the usual "type 7" definition used by spreadsheet and dataframe tools,
//! so the 50th percentile of an even-length sample is the mean of the two middle values.

/// Quantile of an already sorted slice. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Sort a copy of `values` (total order on f64).
pub fn sorted_copy(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.into_iter().collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Median of arbitrary (unsorted) values.
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    quantile_sorted(&sorted_copy(values), 0.5)
}
