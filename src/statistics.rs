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

//! Run counters for the animation scheduler. Purely observational; none
//! of these affect numeric output.

use serde::{Deserialize, Serialize};

/// Counters accumulated across animation runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Runs started, including restarts that displaced a running animation
    pub runs_started: u64,
    /// Runs that reached the final frame
    pub runs_completed: u64,
    /// Runs ended by cancellation
    pub runs_cancelled: u64,
    /// Frames emitted across all runs
    pub frames_emitted: u64,
    /// Frames emitted by the most recently finished run
    pub last_run_frames: u64,
}

impl RunStatistics {
    pub fn record_start(&mut self) {
        self.runs_started += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames_emitted += 1;
    }

    pub fn record_completed(&mut self, frames: u64) {
        self.runs_completed += 1;
        self.last_run_frames = frames;
    }

    pub fn record_cancelled(&mut self, frames: u64) {
        self.runs_cancelled += 1;
        self.last_run_frames = frames;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut stats = RunStatistics::default();

        stats.record_start();
        stats.record_frame();
        stats.record_frame();
        stats.record_cancelled(2);

        stats.record_start();
        stats.record_frame();
        stats.record_completed(1);

        assert_eq!(stats.runs_started, 2);
        assert_eq!(stats.runs_cancelled, 1);
        assert_eq!(stats.runs_completed, 1);
        assert_eq!(stats.frames_emitted, 3);
        assert_eq!(stats.last_run_frames, 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = RunStatistics::default();
        stats.record_start();
        stats.record_frame();
        stats.reset();
        assert_eq!(stats.runs_started, 0);
        assert_eq!(stats.frames_emitted, 0);
    }
}
