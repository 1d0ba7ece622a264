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

//! Signal construction: parsing literal sample vectors and synthesizing
//! canonical continuous-time waveforms over a time window.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// Default sampling interval for synthesized continuous-time signals.
pub const DEFAULT_DT: f64 = 0.02;

/// Whether a signal was entered as discrete samples or sampled from a
/// continuous-time waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalMode {
    Discrete,
    Continuous,
}

/// Canonical waveform shapes available for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveformKind {
    Impulse,
    Step,
    Rectangular,
    Triangular,
    Sawtooth,
}

impl FromStr for WaveformKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "impulse" => Ok(WaveformKind::Impulse),
            "step" => Ok(WaveformKind::Step),
            "rectangular" => Ok(WaveformKind::Rectangular),
            "triangular" => Ok(WaveformKind::Triangular),
            "sawtooth" => Ok(WaveformKind::Sawtooth),
            other => Err(ParseError::InvalidWaveform(other.to_string())),
        }
    }
}

/// An ordered sequence of real samples with an index/time origin and a
/// uniform step (1 for discrete signals, the sampling interval `dt` for
/// continuous ones).
///
/// Immutable once constructed; `values` and `indices` always have the
/// same length and `indices` increases by exactly `step` per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    values: Vec<f64>,
    indices: Vec<f64>,
    step: f64,
    mode: SignalMode,
}

impl Signal {
    /// Parse a comma-separated list of samples with an integer start index.
    ///
    /// Every token must be a valid float literal and the list must be
    /// non-empty; `start_index` must be an integer literal.
    pub fn parse_discrete(values_csv: &str, start_index: &str) -> Result<Self> {
        if values_csv.trim().is_empty() {
            return Err(ParseError::EmptySampleList);
        }

        let mut values = Vec::new();
        for token in values_csv.split(',') {
            let token = token.trim();
            let sample: f64 = token
                .parse()
                .map_err(|_| ParseError::InvalidSample(token.to_string()))?;
            values.push(sample);
        }

        let start: i64 = start_index
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidStartIndex(start_index.trim().to_string()))?;

        let indices = (0..values.len()).map(|i| (start + i as i64) as f64).collect();

        Ok(Self {
            values,
            indices,
            step: 1.0,
            mode: SignalMode::Discrete,
        })
    }

    /// Synthesize a waveform over `[start_time, end_time)` at the default
    /// sampling interval.
    pub fn synthesize(kind: WaveformKind, start_time: f64, end_time: f64, amplitude: f64) -> Self {
        Self::synthesize_with_dt(kind, start_time, end_time, amplitude, DEFAULT_DT)
    }

    /// Synthesize a waveform sampled at `t = start_time + i*dt` while
    /// `t < end_time`.
    ///
    /// An inverted window (`end_time <= start_time`) yields an empty
    /// signal rather than an error.
    pub fn synthesize_with_dt(
        kind: WaveformKind,
        start_time: f64,
        end_time: f64,
        amplitude: f64,
        dt: f64,
    ) -> Self {
        let mut times = Vec::new();
        let mut i = 0usize;
        loop {
            let t = start_time + i as f64 * dt;
            if t >= end_time {
                break;
            }
            times.push(t);
            i += 1;
        }

        let duration = end_time - start_time;
        let midpoint = start_time + duration / 2.0;

        let values: Vec<f64> = match kind {
            WaveformKind::Impulse => {
                // Unit-area spike: all the energy lands on the first sample.
                let mut v = vec![0.0; times.len()];
                if let Some(first) = v.first_mut() {
                    *first = amplitude / dt;
                }
                v
            }
            // Rectangular is intentionally identical to step; downstream
            // consumers depend on the equivalence.
            WaveformKind::Step | WaveformKind::Rectangular => vec![amplitude; times.len()],
            WaveformKind::Triangular => times
                .iter()
                .map(|&t| amplitude * (1.0 - 2.0 * (t - midpoint).abs() / duration))
                .collect(),
            WaveformKind::Sawtooth => times
                .iter()
                .map(|&t| amplitude * (t - start_time) / duration)
                .collect(),
        };

        Self {
            values,
            indices: times,
            step: dt,
            mode: SignalMode::Continuous,
        }
    }

    /// String-parsing front door for synthesis: converts the raw time and
    /// amplitude fields before delegating to [`Signal::synthesize`].
    pub fn synthesize_from_input(
        kind: WaveformKind,
        start_time: &str,
        end_time: &str,
        amplitude: &str,
    ) -> Result<Self> {
        let start = parse_number("start time", start_time)?;
        let end = parse_number("end time", end_time)?;
        let amplitude = parse_number("amplitude", amplitude)?;
        Ok(Self::synthesize(kind, start, end, amplitude))
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn indices(&self) -> &[f64] {
        &self.indices
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn mode(&self) -> SignalMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_continuous(&self) -> bool {
        self.mode == SignalMode::Continuous
    }

    /// First index, or 0 for an empty signal.
    pub fn origin(&self) -> f64 {
        self.indices.first().copied().unwrap_or(0.0)
    }

    /// Last index, or 0 for an empty signal.
    pub fn last_index(&self) -> f64 {
        self.indices.last().copied().unwrap_or(0.0)
    }

    /// Index span `(first, last)`, `None` for an empty signal.
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.indices.first(), self.indices.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim().parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.trim().to_string(),
    })
}
