use clap::{Parser, ValueEnum};

use convolution_studio::{
    convolve, correlate, AnimationConfig, AnimationFrame, AnimationScheduler, ConvolutionResult,
    CorrelationResult, Quality, Renderer, Signal, WaveformKind,
};

// This binary does the following:
// 1. Builds the input signal and impulse response from the command line,
//    either as literal sample vectors (discrete mode) or as synthesized
//    waveforms over a time window (continuous mode).
// 2. Computes the full cross-correlation and reports its dominant lags.
// 3. Computes the full convolution and replays it frame by frame through
//    a renderer that narrates every frame over the log.

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    Discrete,
    Continuous,
}

#[derive(Parser, Debug)]
#[clap(about = "Animated convolution and correlation of two signals", version)]
struct Args {
    #[clap(long, value_enum, default_value = "discrete", help = "Signal entry mode")]
    mode: Mode,

    #[clap(long, default_value = "1,2,3,2,1", help = "Input samples, comma-separated")]
    input_vector: String,

    #[clap(long, default_value = "-2", help = "Input start index")]
    input_start: String,

    #[clap(long, default_value = "1,0.8,0.6,0.4,0.2", help = "Impulse samples, comma-separated")]
    impulse_vector: String,

    #[clap(long, default_value = "0", help = "Impulse start index")]
    impulse_start: String,

    #[clap(long, default_value = "rectangular", help = "Input waveform (continuous mode)")]
    input_kind: WaveformKind,

    #[clap(long, default_value = "0", help = "Input start time")]
    input_start_time: String,

    #[clap(long, default_value = "3", help = "Input end time")]
    input_end_time: String,

    #[clap(long, default_value = "1", help = "Input amplitude")]
    input_amplitude: String,

    #[clap(long, default_value = "triangular", help = "Impulse waveform (continuous mode)")]
    impulse_kind: WaveformKind,

    #[clap(long, default_value = "0", help = "Impulse start time")]
    impulse_start_time: String,

    #[clap(long, default_value = "2", help = "Impulse end time")]
    impulse_end_time: String,

    #[clap(long, default_value = "1", help = "Impulse amplitude")]
    impulse_amplitude: String,

    #[clap(long, default_value_t = 150, help = "Frame interval in milliseconds (1-1000)")]
    speed_ms: u64,

    #[clap(long, default_value = "high", help = "Animation quality: standard or high")]
    quality: Quality,

    #[clap(long, help = "Skip the cross-correlation report")]
    no_correlation: bool,
}

/// Renderer that narrates the animation over the log and prints the
/// computed results to stdout.
struct LogRenderer;

impl Renderer for LogRenderer {
    fn on_setup(&mut self, input: &Signal) {
        log::info!(
            "animating against input of {} samples starting at {}",
            input.len(),
            input.origin()
        );
    }

    fn on_frame(&mut self, frame: &AnimationFrame) {
        let revealed = frame.partial_output_values.last().copied().unwrap_or(0.0);
        match frame.overlap {
            Some((lo, hi)) => log::info!(
                "frame {}: y = {:.4}, overlap [{:.2}, {:.2}], progress {:.1}%",
                frame.frame_index,
                revealed,
                lo,
                hi,
                frame.progress * 100.0
            ),
            None => log::info!(
                "frame {}: y = {:.4}, no overlap, progress {:.1}%",
                frame.frame_index,
                revealed,
                frame.progress * 100.0
            ),
        }
    }

    fn on_final(&mut self, result: &ConvolutionResult, peak: Option<(f64, f64)>) {
        println!("Convolution result: {} samples", result.len());
        print_samples(&result.indices, &result.values);
        match peak {
            Some((index, value)) => println!("Max: {:.4} at index {:.4}", value, index),
            None => println!("Max: n/a (empty result)"),
        }
    }

    fn on_correlation(&mut self, result: &CorrelationResult) {
        println!("Correlation result: {} samples", result.len());
        print_samples(&result.indices, &result.values);
        if result.peaks.is_empty() {
            println!("Dominant lags: none");
        } else {
            let lags: Vec<String> = result.peaks.iter().map(|p| format!("{:.4}", p)).collect();
            println!("Dominant lags: {}", lags.join(", "));
        }
    }
}

const MAX_PRINTED_SAMPLES: usize = 64;

fn print_samples(indices: &[f64], values: &[f64]) {
    if indices.len() > MAX_PRINTED_SAMPLES {
        println!("  ({} samples, listing suppressed)", indices.len());
        return;
    }
    for (index, value) in indices.iter().zip(values) {
        println!("  {:10.4}  {:12.6}", index, value);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (input, impulse) = match args.mode {
        Mode::Discrete => (
            Signal::parse_discrete(&args.input_vector, &args.input_start)?,
            Signal::parse_discrete(&args.impulse_vector, &args.impulse_start)?,
        ),
        Mode::Continuous => (
            Signal::synthesize_from_input(
                args.input_kind,
                &args.input_start_time,
                &args.input_end_time,
                &args.input_amplitude,
            )?,
            Signal::synthesize_from_input(
                args.impulse_kind,
                &args.impulse_start_time,
                &args.impulse_end_time,
                &args.impulse_amplitude,
            )?,
        ),
    };

    log::info!(
        "signals ready: input {} samples, impulse {} samples",
        input.len(),
        impulse.len()
    );

    let mut renderer = Box::new(LogRenderer);

    if !args.no_correlation {
        let correlation = correlate(&input, &impulse);
        renderer.on_correlation(&correlation);
    }

    let result = convolve(&input, &impulse);
    let mut scheduler = AnimationScheduler::new();
    scheduler.start(
        input,
        impulse,
        result,
        renderer,
        AnimationConfig {
            speed_ms: args.speed_ms,
            quality: args.quality,
        },
    );
    scheduler.wait();

    let stats = scheduler.statistics();
    log::info!(
        "done: {} frames emitted, {} run(s) completed",
        stats.frames_emitted,
        stats.runs_completed
    );

    Ok(())
}
