//! Finite-duration amplitude envelopes
//!
//! Envelopes are ordinary signals with a finite length, meant to be
//! multiplied against oscillators or other infinite sources. Constructors
//! validate that every phase duration is non-negative and fail with
//! [`Error::InvalidArgument`] otherwise.

use serde::{Deserialize, Serialize};

use crate::curve::{remap, Curve};
use crate::error::{Error, Result};
use crate::signal::{Node, Signal};

/// Constant amplitude held for `duration` seconds, 0 after.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Envelope {
    pub duration: f64,
    pub amplitude: f64,
}

impl Envelope {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        if t > self.duration {
            0.0
        } else {
            self.amplitude
        }
    }

    pub(crate) fn length(&self) -> f64 {
        self.duration
    }
}

/// One key of a [`KeyedEnvelope`]: the amplitude reached at time `t`, and
/// the curve shaping the transition from the previous key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Key {
    pub t: f64,
    pub amplitude: f64,
    pub curve: Curve,
}

/// Piecewise-curved envelope through a set of time/amplitude keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyedEnvelope {
    keys: Vec<Key>,
}

impl KeyedEnvelope {
    /// Starts the envelope at `amplitude0` at t = 0.
    pub fn new(amplitude0: f64) -> Self {
        KeyedEnvelope {
            keys: vec![Key {
                t: 0.0,
                amplitude: amplitude0,
                curve: Curve::Instant,
            }],
        }
    }

    /// Adds (or replaces) a key. Keys are kept ordered by time.
    pub fn add_key(&mut self, t: f64, amplitude: f64, curve: Curve) -> &mut Self {
        let key = Key { t, amplitude, curve };
        match self.keys.iter().position(|k| k.t >= t) {
            Some(i) if self.keys[i].t == t => self.keys[i] = key,
            Some(i) => self.keys.insert(i, key),
            None => self.keys.push(key),
        }
        self
    }

    pub(crate) fn sample(&self, t: f64) -> f64 {
        if t > self.length() {
            return 0.0;
        }
        let next = match self.keys.iter().position(|k| k.t >= t) {
            Some(i) => i,
            None => return 0.0,
        };
        let b = &self.keys[next];
        if b.t == t || next == 0 {
            return b.amplitude;
        }
        let a = &self.keys[next - 1];
        let u = (t - a.t) / (b.t - a.t);
        b.curve.tween(a.amplitude, b.amplitude, u)
    }

    pub(crate) fn length(&self) -> f64 {
        self.keys.last().map(|k| k.t).unwrap_or(0.0)
    }

    pub fn into_signal(self) -> Signal {
        Signal::new(Node::Keyed(self))
    }
}

/// `amplitude · e^(-decay·t)`, cut off once the tail falls below 0.001.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExponentialDecay {
    pub amplitude: f64,
    pub decay: f64,
}

impl ExponentialDecay {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        self.amplitude * (-self.decay * t).exp()
    }

    pub(crate) fn length(&self) -> f64 {
        -(0.001 / self.amplitude).ln() / self.decay
    }
}

/// Wraps an arbitrary signal as an amplitude envelope by remapping it from
/// [-1, 1] to [0, amplitude] over a fixed duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEnvelope {
    pub signal: Signal,
    pub duration: f64,
    pub amplitude: f64,
}

impl SignalEnvelope {
    pub(crate) fn sample(&self, t: f64) -> f64 {
        if t > self.duration {
            return 0.0;
        }
        remap(self.signal.sample(t), -1.0, 1.0, 0.0, self.amplitude)
    }

    pub(crate) fn length(&self) -> f64 {
        self.duration
    }
}

fn check_durations(durations: &[(&str, f64)]) -> Result<()> {
    for (name, d) in durations {
        if *d < 0.0 || d.is_nan() {
            return Err(Error::InvalidArgument(format!(
                "{name} duration must be non-negative, got {d}"
            )));
        }
    }
    Ok(())
}

/// Amplitude 1 held for `duration` seconds.
pub fn envelope(duration: f64) -> Result<Signal> {
    envelope_with(duration, 1.0)
}

pub fn envelope_with(duration: f64, amplitude: f64) -> Result<Signal> {
    check_durations(&[("envelope", duration)])?;
    Ok(Signal::new(Node::Envelope(Envelope {
        duration,
        amplitude,
    })))
}

/// Attack-sustain-release envelope with peak amplitude 1 and linear ramps.
pub fn asr(attack: f64, sustain: f64, release: f64) -> Result<Signal> {
    asr_with(attack, sustain, release, 1.0, Curve::Linear, Curve::Linear)
}

pub fn asr_with(
    attack: f64,
    sustain: f64,
    release: f64,
    amplitude: f64,
    attack_curve: Curve,
    release_curve: Curve,
) -> Result<Signal> {
    check_durations(&[
        ("attack", attack),
        ("sustain", sustain),
        ("release", release),
    ])?;
    let mut keyed = KeyedEnvelope::new(0.0);
    keyed
        .add_key(attack, amplitude, attack_curve)
        .add_key(attack + sustain, amplitude, Curve::Instant)
        .add_key(attack + sustain + release, 0.0, release_curve);
    Ok(keyed.into_signal())
}

/// Attack-decay-sustain-release envelope; attack peaks at 1, decays to 0.5.
pub fn adsr(attack: f64, decay: f64, sustain: f64, release: f64) -> Result<Signal> {
    adsr_with(
        attack,
        decay,
        sustain,
        release,
        1.0,
        0.5,
        Curve::Linear,
        Curve::Linear,
        Curve::Linear,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn adsr_with(
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,
    attack_amplitude: f64,
    decay_amplitude: f64,
    attack_curve: Curve,
    decay_curve: Curve,
    release_curve: Curve,
) -> Result<Signal> {
    check_durations(&[
        ("attack", attack),
        ("decay", decay),
        ("sustain", sustain),
        ("release", release),
    ])?;
    let mut keyed = KeyedEnvelope::new(0.0);
    keyed
        .add_key(attack, attack_amplitude, attack_curve)
        .add_key(attack + decay, decay_amplitude, decay_curve)
        .add_key(attack + decay + sustain, decay_amplitude, Curve::Instant)
        .add_key(attack + decay + sustain + release, 0.0, release_curve);
    Ok(keyed.into_signal())
}

/// Exponential decay `amplitude · e^(-decay·t)`.
pub fn exponential_decay(amplitude: f64, decay: f64) -> Result<Signal> {
    if amplitude <= 0.0 || decay <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "exponential decay needs positive amplitude and decay, got {amplitude}, {decay}"
        )));
    }
    Ok(Signal::new(Node::ExponentialDecay(ExponentialDecay {
        amplitude,
        decay,
    })))
}

/// Uses `signal`, remapped from [-1, 1] to [0, amplitude], as an envelope
/// lasting `duration` seconds.
pub fn signal_envelope(signal: Signal, duration: f64, amplitude: f64) -> Result<Signal> {
    check_durations(&[("signal envelope", duration)])?;
    Ok(Signal::new(Node::SignalEnvelope(SignalEnvelope {
        signal,
        duration,
        amplitude,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillator::sine;

    const EPS: f64 = 1e-9;

    #[test]
    fn basic_envelope_holds_then_drops() {
        let e = envelope_with(2.0, 0.8).unwrap();
        assert_eq!(e.length(), 2.0);
        assert_eq!(e.sample(0.0), 0.8);
        assert_eq!(e.sample(1.999), 0.8);
        assert_eq!(e.sample(2.001), 0.0);
    }

    #[test]
    fn asr_keypoints() {
        let (a, s, r) = (1.0, 2.0, 0.5);
        let env = asr(a, s, r).unwrap();
        assert_eq!(env.length(), a + s + r);
        assert!(env.sample(0.0).abs() < EPS);
        assert!((env.sample(a) - 1.0).abs() < EPS);
        assert!((env.sample(a + s) - 1.0).abs() < EPS);
        assert!(env.sample(a + s + r).abs() < EPS);
        // mid-attack and mid-release are strictly interior
        let mid_attack = env.sample(a / 2.0);
        assert!(mid_attack > 0.0 && mid_attack < 1.0);
        let mid_release = env.sample(a + s + r / 2.0);
        assert!(mid_release > 0.0 && mid_release < 1.0);
    }

    #[test]
    fn asr_sustain_is_flat() {
        let env = asr(0.5, 1.0, 0.5).unwrap();
        for t in [0.5, 0.75, 1.0, 1.25, 1.5] {
            assert!((env.sample(t) - 1.0).abs() < EPS, "t={t}");
        }
    }

    #[test]
    fn adsr_decays_to_second_amplitude() {
        let env = adsr(0.25, 0.25, 1.0, 0.5).unwrap();
        assert_eq!(env.length(), 2.0);
        assert!((env.sample(0.25) - 1.0).abs() < EPS);
        assert!((env.sample(0.5) - 0.5).abs() < EPS);
        assert!((env.sample(1.5) - 0.5).abs() < EPS);
        assert!(env.sample(2.0).abs() < EPS);
    }

    #[test]
    fn negative_durations_are_rejected() {
        assert!(envelope(-1.0).is_err());
        assert!(asr(1.0, -0.5, 1.0).is_err());
        assert!(adsr(1.0, 1.0, 1.0, -0.1).is_err());
        assert!(signal_envelope(sine(10.0), -1.0, 1.0).is_err());
        assert!(exponential_decay(-1.0, 1.0).is_err());
        assert!(exponential_decay(1.0, 0.0).is_err());
    }

    #[test]
    fn exponential_decay_shape_and_cutoff() {
        let e = exponential_decay(1.0, 6.907755).unwrap();
        // ln(1000)/6.907755 == 1.0
        assert!((e.length() - 1.0).abs() < 1e-6);
        assert!((e.sample(0.0) - 1.0).abs() < EPS);
        assert!(e.sample(0.5) < 1.0);
        assert!(e.sample(0.5) > e.sample(0.9));
    }

    #[test]
    fn signal_envelope_remaps_to_unipolar() {
        let env = signal_envelope(sine(2.0), 1.0, 0.5).unwrap();
        assert_eq!(env.length(), 1.0);
        for i in 0..100 {
            let v = env.sample(i as f64 * 0.01);
            assert!((0.0..=0.5 + EPS).contains(&v));
        }
    }

    #[test]
    fn keyed_envelope_curves_apply() {
        let mut keyed = KeyedEnvelope::new(0.0);
        keyed.add_key(1.0, 1.0, Curve::Smoothstep);
        let env = keyed.into_signal();
        // smoothstep(0.5) == 0.5, smoothstep(0.25) < 0.25
        assert!((env.sample(0.5) - 0.5).abs() < EPS);
        assert!(env.sample(0.25) < 0.25);
    }

    #[test]
    fn keyed_envelope_replaces_duplicate_key() {
        let mut keyed = KeyedEnvelope::new(0.5);
        keyed.add_key(0.0, 0.25, Curve::Instant);
        let env = keyed.into_signal();
        assert_eq!(env.sample(0.0), 0.25);
    }
}
