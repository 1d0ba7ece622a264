//! # Convolution Studio
//!
//! An animated convolution and cross-correlation engine for discrete and
//! sampled continuous-time signals. Signals are parsed from literal
//! sample vectors or synthesized from canonical waveforms; the engine
//! computes full linear convolution and cross-correlation with index
//! bookkeeping, and the animation scheduler replays the convolution
//! frame by frame on a cancellable background worker.

pub mod animator;
pub mod convolution;
pub mod error;
pub mod signal;
pub mod statistics;

pub use animator::{
    AnimationConfig, AnimationFrame, AnimationScheduler, Quality, Renderer, RunState,
};
pub use convolution::{convolve, correlate, ConvolutionResult, CorrelationResult};
pub use error::{ParseError, Result};
pub use signal::{Signal, SignalMode, WaveformKind, DEFAULT_DT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_functionality() {
        let input = Signal::parse_discrete("1,2,3,2,1", "-2").unwrap();
        let impulse = Signal::parse_discrete("1,0.8,0.6,0.4,0.2", "0").unwrap();

        let result = convolve(&input, &impulse);
        assert_eq!(result.len(), 9);
        assert_eq!(result.indices[0], -2.0);
    }
}
