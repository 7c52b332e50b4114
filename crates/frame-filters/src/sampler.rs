//! Deterministic time-windowed sampling
//!
//! The sampler picks roughly `pick` files "at random" while staying stable
//! for a while: the configured interval is cut into `slices` sub-windows, and
//! each of the `slices` most recent sub-windows contributes the files with
//! the lowest signed CRC-32 of `"{window}{path}"`. As wall-clock time
//! advances, one sub-window's contribution is replaced at a time, so the
//! selection rotates gradually.
//!
//! The result is the union of the per-window picks. It is not trimmed to
//! exactly `pick`: overlaps between windows make it smaller, rounding up per
//! window can make it larger.

use crate::stage::FileSet;
use crate::{Error, Result};

/// Default interval, in minutes, over which the selection fully rotates.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 20;

/// Default number of sub-windows per interval.
pub const DEFAULT_SLICES: u64 = 4;

/// Validated sampler parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerParams {
    pick: usize,
    interval_minutes: u64,
    slices: u64,
}

impl SamplerParams {
    /// Build sampler parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampler`] if `interval_minutes` or `slices` is
    /// zero, or if the interval is too short to give each slice at least one
    /// second.
    pub fn new(pick: usize, interval_minutes: u64, slices: u64) -> Result<Self> {
        if interval_minutes == 0 {
            return Err(Error::InvalidSampler {
                message: "interval must be at least one minute".to_string(),
            });
        }
        if slices == 0 {
            return Err(Error::InvalidSampler {
                message: "slices must be at least 1".to_string(),
            });
        }
        if interval_minutes.saturating_mul(60) < slices {
            return Err(Error::InvalidSampler {
                message: format!(
                    "{slices} slices do not fit in a {interval_minutes} minute interval"
                ),
            });
        }
        Ok(Self {
            pick,
            interval_minutes,
            slices,
        })
    }

    /// Parameters with the default interval and slice count.
    pub fn with_pick(pick: usize) -> Self {
        Self {
            pick,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            slices: DEFAULT_SLICES,
        }
    }

    pub fn pick(&self) -> usize {
        self.pick
    }

    pub fn interval_minutes(&self) -> u64 {
        self.interval_minutes
    }

    pub fn slices(&self) -> u64 {
        self.slices
    }

    /// Length of one sub-window in seconds.
    pub fn sub_window_secs(&self) -> u64 {
        self.interval_minutes * 60 / self.slices
    }

    /// Files contributed by each sub-window.
    pub fn per_slice(&self) -> usize {
        let slices = usize::try_from(self.slices).unwrap_or(usize::MAX);
        self.pick.div_ceil(slices).max(1)
    }

    /// Index of the sub-window containing `now` (Unix seconds).
    pub fn window_index(&self, now: u64) -> i64 {
        i64::try_from(now / self.sub_window_secs()).unwrap_or(i64::MAX)
    }
}

/// Checksum ordering a path within one sub-window.
///
/// The CRC-32 is read as a signed 32-bit integer, so checksums with the
/// high bit set rank first.
pub fn window_checksum(window: i64, path: &str) -> i32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(window.to_string().as_bytes());
    hasher.update(path.as_bytes());
    i32::from_ne_bytes(hasher.finalize().to_ne_bytes())
}

/// Sample `files` for the wall-clock second `now`.
///
/// A zero `pick` or an empty input passes the set through unchanged.
pub fn sample(files: FileSet, params: &SamplerParams, now: u64) -> FileSet {
    if params.pick == 0 || files.is_empty() {
        return files;
    }

    let per_slice = params.per_slice();
    let newest = params.window_index(now);

    let mut picked = FileSet::new();
    for back in 0..params.slices {
        let window = newest.saturating_sub(i64::try_from(back).unwrap_or(i64::MAX));

        let mut ranked: Vec<_> = files
            .iter()
            .map(|entry| (window_checksum(window, &entry.path_str()), entry))
            .collect();
        ranked.sort();

        picked.extend(
            ranked
                .into_iter()
                .take(per_slice)
                .map(|(_, entry)| entry.clone()),
        );
    }

    tracing::debug!(
        input = files.len(),
        picked = picked.len(),
        pick = params.pick,
        window = newest,
        "Sampled files"
    );
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_fs::FileEntry;

    fn files(n: usize) -> FileSet {
        (0..n)
            .map(|i| FileEntry::new(format!("/photos/IMG_{i:04}.jpg")))
            .collect()
    }

    #[test]
    fn defaults() {
        let params = SamplerParams::with_pick(10);
        assert_eq!(params.interval_minutes(), 20);
        assert_eq!(params.slices(), 4);
        assert_eq!(params.sub_window_secs(), 300);
    }

    #[test]
    fn per_slice_rounds_up_with_minimum_one() {
        assert_eq!(SamplerParams::with_pick(10).per_slice(), 3);
        assert_eq!(SamplerParams::with_pick(13).per_slice(), 4);
        assert_eq!(SamplerParams::with_pick(8).per_slice(), 2);
        assert_eq!(SamplerParams::with_pick(1).per_slice(), 1);
    }

    #[test]
    fn window_index_uses_floor_division() {
        let params = SamplerParams::with_pick(1);
        assert_eq!(params.window_index(0), 0);
        assert_eq!(params.window_index(299), 0);
        assert_eq!(params.window_index(300), 1);
    }

    #[test]
    fn rejects_zero_slices_and_interval() {
        assert!(SamplerParams::new(5, 20, 0).is_err());
        assert!(SamplerParams::new(5, 0, 4).is_err());
        assert!(SamplerParams::new(5, 1, 61).is_err());
        assert!(SamplerParams::new(5, 1, 60).is_ok());
    }

    #[test]
    fn checksum_is_crc32_of_window_and_path() {
        let expected = i32::from_ne_bytes(crc32fast::hash(b"123/a.jpg").to_ne_bytes());
        assert_eq!(window_checksum(123, "/a.jpg"), expected);
    }

    #[test]
    fn high_bit_checksums_rank_first() {
        // Window 5: "/photos/a.jpg" hashes to 0x56997c3a, "/photos/d.jpg" to 0x9e79f34a
        assert_eq!(window_checksum(5, "/photos/a.jpg"), 0x5699_7c3a);
        assert_eq!(window_checksum(5, "/photos/d.jpg"), 0x9e79_f34a_u32 as i32);

        let input: FileSet = ["/photos/a.jpg", "/photos/d.jpg"]
            .into_iter()
            .map(FileEntry::new)
            .collect();
        let params = SamplerParams::new(1, 20, 1).unwrap();
        let out = sample(input, &params, 5 * 1200);
        assert_eq!(
            out.iter().map(|e| e.path_str().into_owned()).collect::<Vec<_>>(),
            vec!["/photos/d.jpg".to_string()]
        );
    }

    #[test]
    fn zero_pick_passes_through() {
        let input = files(5);
        let out = sample(input.clone(), &SamplerParams::with_pick(0), 1_000_000);
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_stays_empty() {
        let out = sample(FileSet::new(), &SamplerParams::with_pick(3), 1_000_000);
        assert!(out.is_empty());
    }

    #[test]
    fn same_time_same_output() {
        let params = SamplerParams::with_pick(8);
        let a = sample(files(50), &params, 1_700_000_000);
        let b = sample(files(50), &params, 1_700_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn stable_within_one_sub_window() {
        let params = SamplerParams::with_pick(8);
        // 1_700_000_100 and 1_700_000_199 share sub-window 5_666_667
        let a = sample(files(50), &params, 1_700_000_100);
        let b = sample(files(50), &params, 1_700_000_199);
        assert_eq!(a, b);
    }

    #[test]
    fn union_is_bounded_by_slices_times_per_slice() {
        let params = SamplerParams::with_pick(8);
        let out = sample(files(50), &params, 1_700_000_000);
        assert!(!out.is_empty());
        assert!(out.len() <= 8);
        assert!(out.len() >= params.per_slice());
    }

    #[test]
    fn small_input_with_large_pick_returns_subset_of_input() {
        let input = files(3);
        let out = sample(input.clone(), &SamplerParams::with_pick(100), 42);
        assert!(out.is_subset(&input));
        assert_eq!(out, input);
    }
}
