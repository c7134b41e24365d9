//! Trimmed-mean ADC noise filter.
//!
//! One filtered read takes [`SAMPLES`] conversions spaced by
//! [`SAMPLE_SPACING_US`], sorts them, drops [`TRIM_COUNT`] from each tail
//! and averages the middle 51.  The window spans ~30 ms, several mains
//! periods, so both hum and switching bursts land in the trimmed tails.
//!
//! ## Blocking
//!
//! The spacing is a busy-wait through the supplied
//! [`DelayNs`](embedded_hal::delay::DelayNs).  The whole control loop is
//! stalled for the duration (100 × 300 µs plus conversion time, ~30 to 35 ms
//! per channel), which bounds how often the watchdog can be evaluated
//! while the filter is enabled.  Keep it that way unless the loop timing
//! budget is re-derived.

use embedded_hal::delay::DelayNs;

use crate::app::ports::SampleSource;

/// Conversions per filtered read.
pub const SAMPLES: usize = 101;
/// Samples discarded from each end of the sorted window.
pub const TRIM_COUNT: usize = 25;
/// Spacing between conversions.
pub const SAMPLE_SPACING_US: u32 = 300;

/// Denoised reading in millivolts.
pub fn filtered_read<S: SampleSource + ?Sized>(source: &mut S, delay: &mut impl DelayNs) -> f32 {
    let mut window = [0i32; SAMPLES];
    for (i, slot) in window.iter_mut().enumerate() {
        *slot = source.sample();
        if i + 1 < SAMPLES {
            delay.delay_us(SAMPLE_SPACING_US);
        }
    }
    trimmed_mean(&mut window, TRIM_COUNT)
}

/// One reading, filtered or raw depending on the current filter mode.
pub fn read_millivolts<S: SampleSource + ?Sized>(
    source: &mut S,
    delay: &mut impl DelayNs,
    filter_enabled: bool,
) -> f32 {
    if filter_enabled {
        filtered_read(source, delay)
    } else {
        source.sample() as f32
    }
}

/// Sort `samples` in place and average what remains after dropping `trim`
/// values from each end.  Returns `NAN` if nothing remains.
pub fn trimmed_mean(samples: &mut [i32], trim: usize) -> f32 {
    samples.sort_unstable();
    let Some(kept) = samples.get(trim..samples.len().saturating_sub(trim)) else {
        return f32::NAN;
    };
    if kept.is_empty() {
        return f32::NAN;
    }
    let sum: i64 = kept.iter().map(|&v| i64::from(v)).sum();
    (sum as f64 / kept.len() as f64) as f32
}
