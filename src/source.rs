//! Basic signal sources: constants, ramps, time, noise, and recorded samples.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::signal::{Node, Signal, INFINITE};

/// Constant value, infinite length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scalar {
    pub value: f64,
}

impl Scalar {
    pub(crate) fn sample(&self, _t: f64) -> f64 {
        self.value
    }

    pub(crate) fn length(&self) -> f64 {
        INFINITE
    }
}

/// `sample(t) == t`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Time;

impl Time {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        t
    }

    pub(crate) fn length(&self) -> f64 {
        INFINITE
    }
}

/// Linear ramp `initial + rate * t`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ramp {
    pub initial: f64,
    pub rate: f64,
}

impl Ramp {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        self.initial + self.rate * t
    }

    pub(crate) fn length(&self) -> f64 {
        INFINITE
    }
}

/// White noise, uniform in [-1, 1]. Not deterministic per `t`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Noise;

impl Noise {
    pub(crate) fn sample(&self, _t: f64) -> f64 {
        fastrand::f64() * 2.0 - 1.0
    }

    pub(crate) fn length(&self) -> f64 {
        INFINITE
    }
}

/// A signal backed by recorded samples (e.g. an imported WAV file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Samples {
    data: Arc<Vec<f32>>,
    sample_rate: f64,
}

impl Samples {
    pub fn new(data: Vec<f32>, sample_rate: f64) -> Self {
        Samples {
            data: Arc::new(data),
            sample_rate,
        }
    }

    pub(crate) fn sample(&self, t: f64) -> f64 {
        let i = (t * self.sample_rate) as usize;
        match self.data.get(i) {
            Some(v) => *v as f64,
            None => 0.0,
        }
    }

    pub(crate) fn length(&self) -> f64 {
        self.data.len() as f64 / self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

/// Constant signal.
pub fn scalar(value: f64) -> Signal {
    Signal::new(Node::Scalar(Scalar { value }))
}

/// The identity signal over time.
pub fn time() -> Signal {
    Signal::new(Node::Time(Time))
}

/// Unbounded linear ramp starting at `initial` with slope `rate` per second.
pub fn ramp(initial: f64, rate: f64) -> Signal {
    Signal::new(Node::Ramp(Ramp { initial, rate }))
}

/// Ramp that passes through `final_value` at `duration` seconds (and keeps
/// going - bound it with an envelope if needed).
pub fn ramp_to(initial: f64, final_value: f64, duration: f64) -> Signal {
    let rate = if duration != 0.0 {
        (final_value - initial) / duration
    } else {
        0.0
    };
    ramp(initial, rate)
}

/// White noise.
pub fn noise() -> Signal {
    Signal::new(Node::Noise(Noise))
}

/// Signal backed by recorded samples.
pub fn samples(data: Vec<f32>, sample_rate: f64) -> Signal {
    Signal::new(Node::Samples(Samples::new(data, sample_rate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_is_constant_and_infinite() {
        let s = scalar(0.75);
        assert_eq!(s.sample(0.0), 0.75);
        assert_eq!(s.sample(123.0), 0.75);
        assert!(!s.is_finite());
    }

    #[test]
    fn time_is_identity() {
        let t = time();
        assert_eq!(t.sample(1.25), 1.25);
    }

    #[test]
    fn ramp_to_hits_target() {
        let r = ramp_to(0.0, 10.0, 2.0);
        assert_eq!(r.sample(0.0), 0.0);
        assert_eq!(r.sample(2.0), 10.0);
        assert_eq!(r.sample(1.0), 5.0);
    }

    #[test]
    fn noise_stays_in_range() {
        let n = noise();
        for i in 0..1000 {
            let v = n.sample(i as f64 * 0.001);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn samples_lookup_and_length() {
        let s = samples(vec![0.0, 0.5, 1.0, -1.0], 4.0);
        assert_eq!(s.length(), 1.0);
        assert_eq!(s.sample(0.0), 0.0);
        assert_eq!(s.sample(0.25), 0.5);
        assert_eq!(s.sample(0.5), 1.0);
        assert_eq!(s.sample(0.75), -1.0);
    }
}
