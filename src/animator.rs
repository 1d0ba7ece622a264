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

//! Frame-by-frame convolution replay.
//!
//! One background worker per animation run walks the output sample by
//! sample, reporting the flipped-and-shifted impulse response, the
//! overlap with the input span and the partially revealed output to a
//! [`Renderer`]. The worker paces itself between frames and checks a
//! cooperative cancellation flag once per frame boundary; it never
//! suspends mid-computation and never reorders or overlaps callbacks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::convolution::{ConvolutionResult, CorrelationResult};
use crate::error::ParseError;
use crate::signal::Signal;
use crate::statistics::RunStatistics;

/// Permitted frame interval range in milliseconds.
const MIN_SPEED_MS: u64 = 1;
const MAX_SPEED_MS: u64 = 1000;

/// Visual embellishment level requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Standard,
    High,
}

impl Quality {
    /// Divisor applied to the base frame interval. High quality paces
    /// frames faster than standard.
    pub fn pacing_factor(self) -> f64 {
        match self {
            Quality::Standard => 1.2,
            Quality::High => 0.5,
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Quality::Standard),
            "high" => Ok(Quality::High),
            other => Err(ParseError::InvalidQuality(other.to_string())),
        }
    }
}

/// Animation configuration
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Base frame interval in milliseconds, clamped to 1..=1000
    pub speed_ms: u64,
    /// Pacing/embellishment level
    pub quality: Quality,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed_ms: 150,
            quality: Quality::High,
        }
    }
}

/// One step of the animation: the flipped impulse response at its current
/// shift position plus everything revealed so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationFrame {
    /// 0-based frame number; equals the output sample revealed this frame
    pub frame_index: usize,
    /// Index positions of the flipped impulse at its current shift
    pub shifted_impulse_indices: Vec<f64>,
    /// Flipped impulse samples (order reversed, amplitudes kept)
    pub shifted_impulse_values: Vec<f64>,
    /// Index range where the shifted impulse and the input both have
    /// samples; `None` when the spans do not meet
    pub overlap: Option<(f64, f64)>,
    /// Output indices revealed so far (frames 0..=frame_index)
    pub partial_output_indices: Vec<f64>,
    /// Output samples revealed so far
    pub partial_output_values: Vec<f64>,
    /// Fraction of frames produced, in (0, 1]
    pub progress: f64,
}

/// Scheduler lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Callbacks through which the core reports to the presentation layer.
///
/// The callback for frame `i` always returns before frame `i + 1` is
/// produced; implementations never see concurrent or reordered calls.
pub trait Renderer: Send {
    /// Called once per run, before any frame, with the static input signal.
    fn on_setup(&mut self, input: &Signal);

    /// Called once per produced frame, strictly in frame order.
    fn on_frame(&mut self, frame: &AnimationFrame);

    /// Called after the last frame of an uncancelled run with the full
    /// result and its `(index, value)` peak (`None` for empty results).
    fn on_final(&mut self, result: &ConvolutionResult, peak: Option<(f64, f64)>);

    /// Called when a cross-correlation has been computed; the dominant
    /// lags ride in `result.peaks`.
    fn on_correlation(&mut self, result: &CorrelationResult);
}

/// Per-run state shared between the worker and the scheduler handle.
#[derive(Debug)]
struct AnimationState {
    current_frame: usize,
    total_frames: usize,
    state: RunState,
}

struct ActiveRun {
    cancel: Arc<AtomicBool>,
    shared: Arc<Mutex<AnimationState>>,
    handle: Option<JoinHandle<()>>,
}

/// Drives one cancellable background animation at a time.
///
/// `start` spawns a worker and returns immediately; the caller observes
/// progress through [`AnimationScheduler::state`] and
/// [`AnimationScheduler::progress`], or by blocking on
/// [`AnimationScheduler::wait`]. Starting while a run is live cancels
/// and joins the previous worker first, so frames from different runs
/// never interleave.
pub struct AnimationScheduler {
    speed_ms: Arc<AtomicU64>,
    statistics: Arc<Mutex<RunStatistics>>,
    run: Option<ActiveRun>,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            speed_ms: Arc::new(AtomicU64::new(AnimationConfig::default().speed_ms)),
            statistics: Arc::new(Mutex::new(RunStatistics::default())),
            run: None,
        }
    }

    /// Begin animating `result`, reporting every frame to `renderer`.
    ///
    /// Implicitly cancels a previous run that is still live. The input
    /// and impulse signals are only read for display geometry; the
    /// numeric content comes from `result`.
    pub fn start(
        &mut self,
        input: Signal,
        impulse: Signal,
        result: ConvolutionResult,
        renderer: Box<dyn Renderer>,
        config: AnimationConfig,
    ) {
        self.abort_current();

        self.speed_ms.store(
            config.speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS),
            Ordering::Release,
        );

        let total_frames = result.len();
        let cancel = Arc::new(AtomicBool::new(false));
        let shared = Arc::new(Mutex::new(AnimationState {
            current_frame: 0,
            total_frames,
            state: RunState::Running,
        }));

        if let Ok(mut stats) = self.statistics.lock() {
            stats.record_start();
        }
        log::info!(
            "starting animation: {} frames, speed {} ms, quality {:?}",
            total_frames,
            self.speed_ms.load(Ordering::Acquire),
            config.quality
        );

        let worker = Worker {
            input,
            impulse,
            result,
            renderer,
            quality: config.quality,
            cancel: cancel.clone(),
            shared: shared.clone(),
            speed_ms: self.speed_ms.clone(),
            statistics: self.statistics.clone(),
        };
        let handle = thread::spawn(move || worker.run());

        self.run = Some(ActiveRun {
            cancel,
            shared,
            handle: Some(handle),
        });
    }

    /// Request cancellation of the current run.
    ///
    /// Cooperative: the worker observes the flag at its next frame
    /// boundary and stops without emitting further frames. Calling this
    /// with no live run is a no-op.
    pub fn cancel(&self) {
        if let Some(run) = &self.run {
            run.cancel.store(true, Ordering::Release);
            log::debug!("animation cancellation requested");
        }
    }

    /// Change the base frame interval; a running animation re-paces from
    /// its next frame.
    pub fn set_speed_ms(&self, speed_ms: u64) {
        self.speed_ms
            .store(speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS), Ordering::Release);
    }

    /// Current base frame interval in milliseconds.
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms.load(Ordering::Acquire)
    }

    /// Block until the current worker exits (after completion or
    /// cancellation). No-op when nothing is running.
    pub fn wait(&mut self) {
        if let Some(run) = &mut self.run {
            if let Some(handle) = run.handle.take() {
                let _ = handle.join();
            }
        }
    }

    /// Cancel any live run and return to `Idle`, clearing statistics.
    pub fn reset(&mut self) {
        self.abort_current();
        if let Ok(mut stats) = self.statistics.lock() {
            stats.reset();
        }
    }

    pub fn state(&self) -> RunState {
        match &self.run {
            Some(run) => run.shared.lock().map(|s| s.state).unwrap_or(RunState::Idle),
            None => RunState::Idle,
        }
    }

    /// `(current_frame, total_frames)` of the current or last run.
    pub fn progress(&self) -> (usize, usize) {
        match &self.run {
            Some(run) => run
                .shared
                .lock()
                .map(|s| (s.current_frame, s.total_frames))
                .unwrap_or((0, 0)),
            None => (0, 0),
        }
    }

    /// Snapshot of the run counters.
    pub fn statistics(&self) -> RunStatistics {
        self.statistics
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn abort_current(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.cancel.store(true, Ordering::Release);
            if let Some(handle) = run.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

struct Worker {
    input: Signal,
    impulse: Signal,
    result: ConvolutionResult,
    renderer: Box<dyn Renderer>,
    quality: Quality,
    cancel: Arc<AtomicBool>,
    shared: Arc<Mutex<AnimationState>>,
    speed_ms: Arc<AtomicU64>,
    statistics: Arc<Mutex<RunStatistics>>,
}

impl Worker {
    fn run(mut self) {
        self.renderer.on_setup(&self.input);

        let total = self.result.len();
        let step = self.result.step;
        let flipped: Vec<f64> = self.impulse.values().iter().rev().copied().collect();
        // At frame 0 the flipped impulse's last sample sits on the
        // input's first index; each frame shifts right by one step.
        let base_shift =
            self.input.origin() - flipped.len().saturating_sub(1) as f64 * step;
        let input_span = self.input.span();

        let mut revealed_indices: Vec<f64> = Vec::with_capacity(total);
        let mut revealed_values: Vec<f64> = Vec::with_capacity(total);

        for i in 0..total {
            if self.cancel.load(Ordering::Acquire) {
                log::info!("animation cancelled at frame {}/{}", i, total);
                self.finish(RunState::Cancelled, i);
                return;
            }

            let shift = base_shift + i as f64 * step;
            let shifted_indices: Vec<f64> =
                (0..flipped.len()).map(|j| shift + j as f64 * step).collect();

            let overlap = input_span.and_then(|(input_start, input_end)| {
                let (shifted_start, shifted_end) = match (shifted_indices.first(), shifted_indices.last()) {
                    (Some(&first), Some(&last)) => (first, last),
                    _ => return None,
                };
                let lo = input_start.max(shifted_start);
                let hi = input_end.min(shifted_end);
                (lo <= hi).then_some((lo, hi))
            });

            revealed_indices.push(self.result.indices[i]);
            revealed_values.push(self.result.values[i]);

            let frame = AnimationFrame {
                frame_index: i,
                shifted_impulse_indices: shifted_indices,
                shifted_impulse_values: flipped.clone(),
                overlap,
                partial_output_indices: revealed_indices.clone(),
                partial_output_values: revealed_values.clone(),
                progress: (i + 1) as f64 / total as f64,
            };

            if let Ok(mut state) = self.shared.lock() {
                state.current_frame = i;
            }
            self.renderer.on_frame(&frame);
            if let Ok(mut stats) = self.statistics.lock() {
                stats.record_frame();
            }

            let interval_ms =
                self.speed_ms.load(Ordering::Acquire) as f64 / self.quality.pacing_factor();
            thread::sleep(Duration::from_secs_f64(interval_ms / 1000.0));
        }

        self.finish(RunState::Completed, total);
        self.renderer.on_final(&self.result, self.result.peak());
        log::info!("animation completed: {} frames", total);
    }

    fn finish(&mut self, state: RunState, frames: usize) {
        if let Ok(mut shared) = self.shared.lock() {
            shared.state = state;
        }
        if let Ok(mut stats) = self.statistics.lock() {
            match state {
                RunState::Cancelled => stats.record_cancelled(frames as u64),
                _ => stats.record_completed(frames as u64),
            }
        }
    }
}
