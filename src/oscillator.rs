//! Periodic oscillators
//!
//! All oscillators share one phase law: `phi(t) = 2π·f(t)·t`, where the
//! frequency `f` is itself a signal (a constant, a ramp for chirps, or any
//! other modulator). Optional FM adds `index · m(t)` to the phase. The
//! waveform variants differ only in the periodic function applied to phase.
//! Oscillators are infinite unless driven by a finite frequency signal;
//! bound them by multiplying with an envelope.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::curve::clamp01;
use crate::signal::{Node, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
    /// Pulse-width modulated square with duty cycle in [0, 1].
    Pwm { duty: f64 },
}

/// Phase modulation parameters: `phi += index * modulation.sample(t)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FmParams {
    pub modulation: Signal,
    pub index: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub freq: Signal,
    pub fm: Option<FmParams>,
}

impl Oscillator {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        let mut phi = TAU * self.freq.sample(t) * t;
        if let Some(fm) = &self.fm {
            phi += fm.index * fm.modulation.sample(t);
        }
        match self.waveform {
            Waveform::Sine => phi.sin(),
            Waveform::Square => {
                if phi.sin() > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => phi.rem_euclid(TAU) / PI - 1.0,
            Waveform::Triangle => (2.0 / PI) * phi.sin().asin(),
            Waveform::Pwm { duty } => {
                if phi.rem_euclid(TAU) / TAU < duty {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Infinite unless the frequency or modulation signal is finite.
    pub(crate) fn length(&self) -> f64 {
        let mut len = self.freq.length();
        if let Some(fm) = &self.fm {
            len = len.min(fm.modulation.length());
        }
        len
    }
}

fn oscillator(waveform: Waveform, freq: impl Into<Signal>) -> Signal {
    Signal::new(Node::Oscillator(Oscillator {
        waveform,
        freq: freq.into(),
        fm: None,
    }))
}

/// Sine oscillator. `freq` may be a constant in Hz or any frequency signal.
pub fn sine(freq: impl Into<Signal>) -> Signal {
    oscillator(Waveform::Sine, freq)
}

/// Square oscillator.
pub fn square(freq: impl Into<Signal>) -> Signal {
    oscillator(Waveform::Square, freq)
}

/// Sawtooth oscillator.
pub fn saw(freq: impl Into<Signal>) -> Signal {
    oscillator(Waveform::Saw, freq)
}

/// Triangle oscillator.
pub fn triangle(freq: impl Into<Signal>) -> Signal {
    oscillator(Waveform::Triangle, freq)
}

/// Pulse-width modulated oscillator; `duty` is clamped to [0, 1].
pub fn pwm(freq: f64, duty: f64) -> Signal {
    oscillator(
        Waveform::Pwm {
            duty: clamp01(duty),
        },
        freq,
    )
}

/// Frequency-modulated sine: `sin(2π·freq·t + index·sin(2π·modulation·t))`.
pub fn sine_fm(freq: f64, modulation: f64, index: f64) -> Signal {
    Signal::new(Node::Oscillator(Oscillator {
        waveform: Waveform::Sine,
        freq: freq.into(),
        fm: Some(FmParams {
            modulation: sine(modulation),
            index,
        }),
    }))
}

/// Linear chirp starting at `freq` Hz and sweeping at `rate` Hz per second.
pub fn chirp(freq: f64, rate: f64) -> Signal {
    // sin(2π·(f + rate/2·t)·t) sweeps the instantaneous frequency at `rate`.
    sine(crate::source::ramp(freq, rate / 2.0))
}
