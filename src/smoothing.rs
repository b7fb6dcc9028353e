//! Smoothing passes over the sample sequence.
//!
//! Raw GPS speed readings jitter enough to make a plotted speed curve
//! unreadable, and raw elevation noise inflates ascent/descent totals.
//! Both passes here produce derived vectors keyed by sample index and
//! never touch the samples themselves.

use crate::WorkoutSample;

/// Default smoothing window for speed values, in milliseconds. Samples
/// whose time offset lies within this distance of the center sample
/// contribute to its smoothed value.
pub const SPEED_WINDOW_MS: u64 = 10_000;

/// Smooth instantaneous speed with a centered time-windowed moving average.
///
/// For each sample, all samples within [`SPEED_WINDOW_MS`] of its offset
/// (including itself) are averaged. The result has exactly one value per
/// input sample, in input order. Empty input yields an empty vector.
pub fn smooth_speed(samples: &[WorkoutSample]) -> Vec<f64> {
    smooth_speed_with_window(samples, SPEED_WINDOW_MS)
}

/// Same as [`smooth_speed`] with an explicit window size.
pub fn smooth_speed_with_window(samples: &[WorkoutSample], window_ms: u64) -> Vec<f64> {
    let mut out = Vec::with_capacity(samples.len());
    let mut lo = 0usize;
    let mut hi = 0usize;
    let mut sum = 0.0f64;

    // Offsets are monotonic non-decreasing, so the window advances with
    // two indices instead of rescanning per sample.
    for sample in samples {
        let min_offset = sample.offset_ms.saturating_sub(window_ms);
        let max_offset = sample.offset_ms + window_ms;

        while hi < samples.len() && samples[hi].offset_ms <= max_offset {
            sum += samples[hi].speed_mps;
            hi += 1;
        }
        while lo < hi && samples[lo].offset_ms < min_offset {
            sum -= samples[lo].speed_mps;
            lo += 1;
        }

        out.push(sum / (hi - lo) as f64);
    }

    out
}

/// 3-point median filter for elevation.
///
/// Endpoints repeat themselves as the missing neighbor so the output keeps
/// the input length. Used by the summary pass before integrating
/// ascent/descent.
pub fn median_elevation(samples: &[WorkoutSample]) -> Vec<f64> {
    let n = samples.len();
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let e0 = if i > 0 {
            samples[i - 1].elevation_m
        } else {
            samples[i].elevation_m
        };
        let e1 = samples[i].elevation_m;
        let e2 = if i + 1 < n {
            samples[i + 1].elevation_m
        } else {
            samples[i].elevation_m
        };

        let mut win = [e0, e1, e2];
        win.sort_by(|a, b| a.total_cmp(b));
        out.push(win[1]);
    }

    out
}
