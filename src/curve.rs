//! Tweening and roll-off curves
//!
//! A `Curve` maps a normalized interpolant in [0, 1] onto [0, 1]. Envelopes
//! use curves to shape the transition between amplitude keys; the spatializer
//! uses them as roll-off laws. Every curve except `Instant` and `Delayed`
//! is monotonic non-decreasing with `evaluate(0) == 0` and `evaluate(1) == 1`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Curve {
    /// Jumps to the end value immediately.
    Instant,
    /// Holds the start value until t = 1.
    Delayed,
    #[default]
    Linear,
    /// Hermite smoothing, 3t² - 2t³.
    Smoothstep,
    /// Second-order Hermite smoothing, 6t⁵ - 15t⁴ + 10t³.
    Smootherstep,
    /// Third-order Hermite smoothing, -20t⁷ + 70t⁶ - 84t⁵ + 35t⁴.
    Smootheststep,
    /// Fast rise, slow settle: ln(1 + 9t) / ln 10.
    Logarithmic,
    /// Slow rise, fast settle: (10ᵗ - 1) / 9.
    Exponential,
}

impl Curve {
    /// Evaluates the curve at `t`, clamped to [0, 1].
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = clamp01(t);
        match self {
            Curve::Instant => 1.0,
            Curve::Delayed => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Curve::Linear => t,
            Curve::Smoothstep => t * t * (3.0 - 2.0 * t),
            Curve::Smootherstep => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
            Curve::Smootheststep => {
                t * t * t * t * (t * (t * (t * -20.0 + 70.0) - 84.0) + 35.0)
            }
            Curve::Logarithmic => (1.0 + 9.0 * t).ln() / 10.0f64.ln(),
            Curve::Exponential => (10.0f64.powf(t) - 1.0) / 9.0,
        }
    }

    /// Interpolates from `a` to `b` with the curve applied to `t`.
    pub fn tween(&self, a: f64, b: f64, t: f64) -> f64 {
        lerp(a, b, self.evaluate(t))
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Remaps `v` from [in_min, in_max] to [out_min, out_max].
pub(crate) fn remap(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (v - in_min) * (out_max - out_min) / (in_max - in_min)
}
