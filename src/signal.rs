//! Core signal abstraction
//!
//! A [`Signal`] is a deterministic function of time: `sample(t)` returns an
//! amplitude for `t` in seconds, and `length()` reports how long the signal
//! lasts (possibly [`INFINITE`]). Signals are cheap to clone - the node tree
//! is shared behind an `Arc` - and immutable once built, apart from the
//! per-signal `gain`/`bias` overlay applied at sample time.
//!
//! Signals compose algebraically:
//!
//! ```
//! use tactus::prelude::*;
//!
//! let sig = sine(440.0) * asr(1.0, 1.0, 1.0).unwrap();
//! assert_eq!(sig.length(), 3.0);
//! ```
//!
//! `sig * sig` and `sig + sig` allocate Product/Sum nodes; `sig * k` and
//! `sig + k` only adjust the overlay. `a << b` sequences signals in time
//! (see [`crate::sequence`]).

use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, ExponentialDecay, KeyedEnvelope, SignalEnvelope};
use crate::oscillator::Oscillator;
use crate::process::{Repeater, Stretcher};
use crate::sequence::Sequence;
use crate::source::{Noise, Ramp, Samples, Scalar, Time};

/// Sentinel length of signals that never end.
pub const INFINITE: f64 = f64::INFINITY;

/// A time-indexed amplitude function with a finite or infinite duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    node: Arc<Node>,
    /// Multiplies every in-range sample.
    pub gain: f64,
    /// Added to every in-range sample.
    pub bias: f64,
}

/// Closed set of signal node variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Zero,
    Scalar(Scalar),
    Time(Time),
    Ramp(Ramp),
    Noise(Noise),
    Samples(Samples),
    Oscillator(Oscillator),
    Envelope(Envelope),
    Keyed(KeyedEnvelope),
    ExponentialDecay(ExponentialDecay),
    SignalEnvelope(SignalEnvelope),
    Sum(Operator),
    Product(Operator),
    Sequence(Sequence),
    Repeater(Repeater),
    Stretcher(Stretcher),
}

/// Operands of a binary combinator node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub lhs: Signal,
    pub rhs: Signal,
}

impl Node {
    fn sample(&self, t: f64) -> f64 {
        match self {
            Node::Zero => 0.0,
            Node::Scalar(s) => s.sample(t),
            Node::Time(s) => s.sample(t),
            Node::Ramp(s) => s.sample(t),
            Node::Noise(s) => s.sample(t),
            Node::Samples(s) => s.sample(t),
            Node::Oscillator(s) => s.sample(t),
            Node::Envelope(s) => s.sample(t),
            Node::Keyed(s) => s.sample(t),
            Node::ExponentialDecay(s) => s.sample(t),
            Node::SignalEnvelope(s) => s.sample(t),
            Node::Sum(op) => op.lhs.sample(t) + op.rhs.sample(t),
            Node::Product(op) => op.lhs.sample(t) * op.rhs.sample(t),
            Node::Sequence(s) => s.sample(t),
            Node::Repeater(s) => s.sample(t),
            Node::Stretcher(s) => s.sample(t),
        }
    }

    fn length(&self) -> f64 {
        match self {
            Node::Zero => INFINITE,
            Node::Scalar(s) => s.length(),
            Node::Time(s) => s.length(),
            Node::Ramp(s) => s.length(),
            Node::Noise(s) => s.length(),
            Node::Samples(s) => s.length(),
            Node::Oscillator(s) => s.length(),
            Node::Envelope(s) => s.length(),
            Node::Keyed(s) => s.length(),
            Node::ExponentialDecay(s) => s.length(),
            Node::SignalEnvelope(s) => s.length(),
            // The finite operand bounds the combination; infinite only when
            // both operands are infinite.
            Node::Sum(op) | Node::Product(op) => op.lhs.length().min(op.rhs.length()),
            Node::Sequence(s) => s.length(),
            Node::Repeater(s) => s.length(),
            Node::Stretcher(s) => s.length(),
        }
    }
}

impl Signal {
    pub fn new(node: Node) -> Self {
        Signal {
            node: Arc::new(node),
            gain: 1.0,
            bias: 0.0,
        }
    }

    /// A signal that is always silent.
    pub fn zero() -> Self {
        Signal::new(Node::Zero)
    }

    /// Samples the signal at time `t` in seconds.
    ///
    /// Sampling outside `[0, length]` yields 0, overlay included.
    pub fn sample(&self, t: f64) -> f64 {
        if t < 0.0 || t > self.node.length() {
            return 0.0;
        }
        self.gain * self.node.sample(t) + self.bias
    }

    /// Length in seconds, or [`INFINITE`].
    pub fn length(&self) -> f64 {
        self.node.length()
    }

    /// True unless the signal lasts forever.
    pub fn is_finite(&self) -> bool {
        self.node.length() != INFINITE
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl Default for Signal {
    fn default() -> Self {
        Signal::zero()
    }
}

impl From<f64> for Signal {
    fn from(value: f64) -> Self {
        Signal::new(Node::Scalar(Scalar { value }))
    }
}

// sig * sig -> Product node; sig op scalar -> overlay arithmetic. The
// operands are never mutated; combination clones shared node trees.

impl Mul for Signal {
    type Output = Signal;
    fn mul(self, rhs: Signal) -> Signal {
        Signal::new(Node::Product(Operator { lhs: self, rhs }))
    }
}

impl Add for Signal {
    type Output = Signal;
    fn add(self, rhs: Signal) -> Signal {
        Signal::new(Node::Sum(Operator { lhs: self, rhs }))
    }
}

impl Mul<f64> for Signal {
    type Output = Signal;
    fn mul(mut self, rhs: f64) -> Signal {
        self.gain *= rhs;
        self.bias *= rhs;
        self
    }
}

impl Mul<Signal> for f64 {
    type Output = Signal;
    fn mul(self, rhs: Signal) -> Signal {
        rhs * self
    }
}

impl Add<f64> for Signal {
    type Output = Signal;
    fn add(mut self, rhs: f64) -> Signal {
        self.bias += rhs;
        self
    }
}

impl Add<Signal> for f64 {
    type Output = Signal;
    fn add(self, rhs: Signal) -> Signal {
        rhs + self
    }
}

impl Sub<f64> for Signal {
    type Output = Signal;
    fn sub(mut self, rhs: f64) -> Signal {
        self.bias -= rhs;
        self
    }
}

impl Sub<Signal> for f64 {
    type Output = Signal;
    fn sub(self, rhs: Signal) -> Signal {
        -rhs + self
    }
}

impl Neg for Signal {
    type Output = Signal;
    fn neg(mut self) -> Signal {
        self.gain = -self.gain;
        self.bias = -self.bias;
        self
    }
}
