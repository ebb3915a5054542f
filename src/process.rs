//! Time processes: repeating and stretching existing signals.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::signal::{Node, Signal};

/// Loops a signal a fixed number of times with a delay between repetitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repeater {
    pub signal: Signal,
    pub repetitions: u32,
    pub delay: f64,
}

impl Repeater {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        let sig_len = self.signal.length();
        let period = sig_len + self.delay;
        if period <= 0.0 {
            return self.signal.sample(t);
        }
        let s = t.rem_euclid(period);
        if s <= sig_len {
            self.signal.sample(s)
        } else {
            0.0
        }
    }

    pub(crate) fn length(&self) -> f64 {
        self.signal.length() * self.repetitions as f64
            + self.delay * self.repetitions.saturating_sub(1) as f64
    }
}

/// Scales a signal in time by a constant factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stretcher {
    pub signal: Signal,
    pub factor: f64,
}

impl Stretcher {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        self.signal.sample(t / self.factor)
    }

    pub(crate) fn length(&self) -> f64 {
        self.signal.length() * self.factor
    }
}

/// Plays `signal` back to back `repetitions` times.
pub fn repeat(signal: Signal, repetitions: u32) -> Result<Signal> {
    repeat_with(signal, repetitions, 0.0)
}

/// Plays `signal` `repetitions` times with `delay` seconds of silence
/// between repetitions.
pub fn repeat_with(signal: Signal, repetitions: u32, delay: f64) -> Result<Signal> {
    if repetitions == 0 {
        return Err(Error::InvalidArgument(
            "repeat needs at least one repetition".to_string(),
        ));
    }
    if delay < 0.0 || delay.is_nan() {
        return Err(Error::InvalidArgument(format!(
            "repeat delay must be non-negative, got {delay}"
        )));
    }
    Ok(Signal::new(Node::Repeater(Repeater {
        signal,
        repetitions,
        delay,
    })))
}

/// Stretches `signal` in time by `factor` (2.0 plays half as fast and
/// doubles the length).
pub fn stretch(signal: Signal, factor: f64) -> Result<Signal> {
    if !(factor > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "stretch factor must be positive, got {factor}"
        )));
    }
    Ok(Signal::new(Node::Stretcher(Stretcher { signal, factor })))
}
