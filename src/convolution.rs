/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Full linear convolution and cross-correlation over indexed signals.
//!
//! The computation is the direct definition, not a transform: output
//! length is `len(a) + len(b) - 1` and index bookkeeping follows the
//! full-overlap convention. Continuous-mode inputs scale every output
//! sample by the sampling interval (Riemann approximation of the
//! convolution integral).

use serde::{Deserialize, Serialize};

use crate::signal::Signal;

/// Fraction of the peak magnitude above which a correlation sample is
/// marked as a dominant lag.
const PEAK_THRESHOLD: f64 = 0.7;

/// Full convolution output paired with the signals that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvolutionResult {
    pub values: Vec<f64>,
    pub indices: Vec<f64>,
    pub step: f64,
    pub input: Signal,
    pub impulse: Signal,
}

impl ConvolutionResult {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(index, value)` of the maximum output sample, first occurrence on
    /// ties; `None` for an empty result.
    pub fn peak(&self) -> Option<(f64, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.values.iter().enumerate() {
            let improved = match best {
                None => true,
                Some((_, current)) => v > current,
            };
            if improved {
                best = Some((i, v));
            }
        }
        best.map(|(i, v)| (self.indices[i], v))
    }
}

/// Full cross-correlation output, including the dominant-lag marker set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub values: Vec<f64>,
    pub indices: Vec<f64>,
    pub step: f64,
    /// Index values of every sample whose magnitude exceeds 0.7 of the
    /// largest magnitude; ties all included.
    pub peaks: Vec<f64>,
    pub input: Signal,
    pub impulse: Signal,
}

impl CorrelationResult {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compute the full linear convolution `y[n] = Σ_k a[k]·b[n-k]`.
///
/// Output origin is `a.origin + b.origin`. Either input empty yields an
/// empty result. If either input is continuous the output samples are
/// scaled by the sampling interval and the output index step is that
/// interval.
pub fn convolve(a: &Signal, b: &Signal) -> ConvolutionResult {
    let mut values = direct_convolution(a.values(), b.values());
    let (scale, step) = output_scale(a, b);
    if scale != 1.0 {
        for v in &mut values {
            *v *= scale;
        }
    }
    let indices = index_run(a.origin() + b.origin(), step, values.len());

    ConvolutionResult {
        values,
        indices,
        step,
        input: a.clone(),
        impulse: b.clone(),
    }
}

/// Compute the full cross-correlation of `a` against `b`.
///
/// Equivalent to convolving `a` with the sample-reversed `b`; output
/// origin is `a.origin - b.last_index`. The same continuous-mode scaling
/// as [`convolve`] applies.
pub fn correlate(a: &Signal, b: &Signal) -> CorrelationResult {
    let reversed: Vec<f64> = b.values().iter().rev().copied().collect();
    let mut values = direct_convolution(a.values(), &reversed);
    let (scale, step) = output_scale(a, b);
    if scale != 1.0 {
        for v in &mut values {
            *v *= scale;
        }
    }
    let indices = index_run(a.origin() - b.last_index(), step, values.len());
    let peaks = dominant_lags(&values, &indices);

    CorrelationResult {
        values,
        indices,
        step,
        peaks,
        input: a.clone(),
        impulse: b.clone(),
    }
}

fn direct_convolution(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

// The continuous input's step drives both the Riemann scaling and the
// output index step; the input signal wins when both are continuous.
fn output_scale(a: &Signal, b: &Signal) -> (f64, f64) {
    if a.is_continuous() {
        (a.step(), a.step())
    } else if b.is_continuous() {
        (b.step(), b.step())
    } else {
        (1.0, 1.0)
    }
}

fn index_run(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + i as f64 * step).collect()
}

fn dominant_lags(values: &[f64], indices: &[f64]) -> Vec<f64> {
    let max_magnitude = values.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
    if max_magnitude == 0.0 {
        return Vec::new();
    }
    values
        .iter()
        .zip(indices)
        .filter(|(v, _)| v.abs() > PEAK_THRESHOLD * max_magnitude)
        .map(|(_, &index)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::WaveformKind;

    const EPS: f64 = 1e-9;

    fn discrete(csv: &str, start: &str) -> Signal {
        Signal::parse_discrete(csv, start).unwrap()
    }

    #[test]
    fn convolution_length_and_origin() {
        let input = discrete("1,2,3,2,1", "-2");
        let impulse = discrete("1,0.8,0.6,0.4,0.2", "0");
        let result = convolve(&input, &impulse);

        assert_eq!(result.len(), 9);
        assert_eq!(result.indices[0], -2.0);
        assert!((result.values[0] - 1.0).abs() < EPS);
    }

    #[test]
    fn convolution_matches_hand_computation() {
        let a = discrete("1,2,3", "0");
        let b = discrete("0,1,0.5", "0");
        let result = convolve(&a, &b);
        let expected = [0.0, 1.0, 2.5, 4.0, 1.5];
        for (got, want) in result.values.iter().zip(expected.iter()) {
            assert!((got - want).abs() < EPS, "got {:?}", result.values);
        }
    }

    #[test]
    fn convolution_is_commutative() {
        let a = discrete("1,-2,3.5,0.25", "-1");
        let b = discrete("0.5,4,-1", "2");
        let ab = convolve(&a, &b);
        let ba = convolve(&b, &a);
        assert_eq!(ab.len(), ba.len());
        for (x, y) in ab.values.iter().zip(ba.values.iter()) {
            assert!((x - y).abs() < EPS);
        }
        assert_eq!(ab.indices[0], ba.indices[0]);
    }

    #[test]
    fn convolution_of_empty_signal_is_empty() {
        let a = discrete("1,2", "0");
        let empty = Signal::synthesize(WaveformKind::Step, 1.0, 0.0, 1.0);
        assert!(convolve(&a, &empty).is_empty());
        assert!(convolve(&empty, &a).is_empty());
        assert!(convolve(&empty, &a).peak().is_none());
    }

    #[test]
    fn continuous_convolution_scales_by_dt() {
        let dt = 0.02;
        let a = Signal::synthesize_with_dt(WaveformKind::Step, 0.0, 0.1, 1.0, dt);
        let b = Signal::synthesize_with_dt(WaveformKind::Step, 0.0, 0.1, 2.0, dt);
        let result = convolve(&a, &b);

        assert_eq!(result.len(), 9);
        assert!((result.step - dt).abs() < EPS);
        assert!((result.indices[1] - result.indices[0] - dt).abs() < EPS);

        // Every sample equals the unscaled discrete convolution times dt.
        let da = discrete("1,1,1,1,1", "0");
        let db = discrete("2,2,2,2,2", "0");
        let reference = convolve(&da, &db);
        assert_eq!(result.len(), reference.len());
        for (c, d) in result.values.iter().zip(reference.values.iter()) {
            assert!((c - d * dt).abs() < EPS);
        }
    }

    #[test]
    fn correlation_matches_reference_sequence() {
        let a = discrete("1,2,3", "0");
        let b = discrete("0,1,0.5", "0");
        let result = correlate(&a, &b);
        let expected = [0.5, 2.0, 3.5, 3.0, 0.0];
        for (got, want) in result.values.iter().zip(expected.iter()) {
            assert!((got - want).abs() < EPS, "got {:?}", result.values);
        }
    }

    #[test]
    fn correlation_origin_uses_last_impulse_index() {
        let a = discrete("1,2,3", "-2");
        let b = discrete("1,1", "3");
        let result = correlate(&a, &b);
        // a.origin - b.last_index = -2 - 4
        assert_eq!(result.indices[0], -6.0);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn correlation_peaks_cover_all_dominant_lags() {
        let a = discrete("1,0,0,1", "0");
        let b = discrete("1", "0");
        let result = correlate(&a, &b);
        // Two equal-magnitude peaks; both must be marked.
        assert_eq!(result.peaks, vec![0.0, 3.0]);
    }

    #[test]
    fn correlation_of_silence_has_no_peaks() {
        let a = discrete("0,0,0", "0");
        let b = discrete("0,0", "0");
        let result = correlate(&a, &b);
        assert!(result.peaks.is_empty());
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn peak_reports_first_occurrence_on_ties() {
        let a = discrete("1,0,1", "0");
        let b = discrete("1", "0");
        let result = convolve(&a, &b);
        assert_eq!(result.peak(), Some((0.0, 1.0)));
    }
}
