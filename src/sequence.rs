//! Time-ordered composition of signals
//!
//! A `Sequence` places child signals at explicit offsets along one timeline
//! and keeps a movable insertion cursor (the *head*). Pushing a signal
//! places it at the head and advances the head by its length; pushing a
//! plain number moves the head only (a pause when positive, an overlap when
//! negative - the head is deliberately unclamped, and overlapping children
//! mix by summation).
//!
//! ```
//! use tactus::prelude::*;
//!
//! let seq = sine(440.0) * asr(0.1, 0.1, 0.1).unwrap()
//!     << 0.25
//!     << sine(880.0) * asr(0.1, 0.1, 0.1).unwrap();
//! assert!((seq.length() - 0.85).abs() < 1e-9);
//! ```

use std::ops::Shl;

use serde::{Deserialize, Serialize};

use crate::signal::{Node, Signal};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceKey {
    pub offset: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sequence {
    head: f64,
    keys: Vec<SequenceKey>,
    length: f64,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence::default()
    }

    /// Current insertion cursor in seconds.
    pub fn head(&self) -> f64 {
        self.head
    }

    /// Relocates the cursor without touching placed children.
    pub fn set_head(&mut self, t: f64) {
        self.head = t;
    }

    /// Places `signal` at the head and advances the head by its length.
    pub fn push(&mut self, signal: impl Into<Signal>) {
        let signal = signal.into();
        let new_head = self.head + signal.length();
        if new_head > self.length {
            self.length = new_head;
        }
        self.keys.push(SequenceKey {
            offset: self.head,
            signal,
        });
        self.head = new_head;
    }

    /// Moves the head by `dt` seconds without placing a child. Negative
    /// values rewind the head to overlap subsequent pushes; a pure delay
    /// never extends the sequence length.
    pub fn push_delay(&mut self, dt: f64) {
        self.head += dt;
    }

    /// Places `signal` at absolute offset `t`; the head does not move.
    pub fn insert(&mut self, signal: impl Into<Signal>, t: f64) {
        let signal = signal.into();
        let end = t + signal.length();
        if end > self.length {
            self.length = end;
        }
        self.keys.push(SequenceKey { offset: t, signal });
    }

    /// Removes all children and resets head and length to 0.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.head = 0.0;
        self.length = 0.0;
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Mix of every child whose local time lies in `[0, length)`.
    pub(crate) fn sample(&self, t: f64) -> f64 {
        let mut sum = 0.0;
        for k in &self.keys {
            if t >= k.offset && t - k.offset < k.signal.length() {
                sum += k.signal.sample(t - k.offset);
            }
        }
        sum
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Samples the sequence as it currently stands.
    pub fn sample_at(&self, t: f64) -> f64 {
        self.sample(t)
    }
}

impl From<Sequence> for Signal {
    /// Snapshots the sequence as an opaque signal child; later mutation of
    /// the original sequence does not affect the signal.
    fn from(seq: Sequence) -> Signal {
        Signal::new(Node::Sequence(seq))
    }
}

// `a << b` sequencing operators, mirroring push semantics.

impl Shl<Signal> for Signal {
    type Output = Sequence;
    fn shl(self, rhs: Signal) -> Sequence {
        let mut seq = Sequence::new();
        seq.push(self);
        seq.push(rhs);
        seq
    }
}

impl Shl<f64> for Signal {
    type Output = Sequence;
    fn shl(self, rhs: f64) -> Sequence {
        let mut seq = Sequence::new();
        seq.push(self);
        seq.push_delay(rhs);
        seq
    }
}

impl Shl<Sequence> for Signal {
    type Output = Sequence;
    fn shl(self, rhs: Sequence) -> Sequence {
        let mut seq = Sequence::new();
        seq.push(self);
        seq.push(rhs);
        seq
    }
}

impl Shl<Signal> for Sequence {
    type Output = Sequence;
    fn shl(mut self, rhs: Signal) -> Sequence {
        self.push(rhs);
        self
    }
}

impl Shl<f64> for Sequence {
    type Output = Sequence;
    fn shl(mut self, rhs: f64) -> Sequence {
        self.push_delay(rhs);
        self
    }
}

impl Shl<Sequence> for Sequence {
    type Output = Sequence;
    fn shl(mut self, rhs: Sequence) -> Sequence {
        self.push(rhs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::envelope_with;
    use crate::signal::INFINITE;

    const EPS: f64 = 1e-9;

    fn block(len: f64, amp: f64) -> Signal {
        envelope_with(len, amp).unwrap()
    }

    #[test]
    fn push_concatenates() {
        let mut seq = Sequence::new();
        seq.push(block(1.0, 0.25));
        seq.push(block(2.0, 0.5));
        assert_eq!(seq.length(), 3.0);
        assert_eq!(seq.head(), 3.0);

        let sig = Signal::from(seq);
        assert!((sig.sample(0.5) - 0.25).abs() < EPS);
        // 1.0 belongs to the second child only; child windows are half-open
        assert!((sig.sample(1.0) - 0.5).abs() < EPS);
        assert!((sig.sample(1.5) - 0.5).abs() < EPS);
        assert!((sig.sample(1.0 + 0.5) - block(2.0, 0.5).sample(0.5)).abs() < EPS);
        assert_eq!(sig.sample(3.5), 0.0);
    }

    #[test]
    fn delay_moves_head_without_extending_length() {
        let mut seq = Sequence::new();
        seq.push(block(1.0, 1.0));
        seq.push_delay(2.0);
        assert_eq!(seq.length(), 1.0);
        assert_eq!(seq.head(), 3.0);
        seq.push(block(1.0, 1.0));
        assert_eq!(seq.length(), 4.0);
        let sig = Signal::from(seq);
        assert_eq!(sig.sample(2.0), 0.0);
        assert_eq!(sig.sample(3.5), 1.0);
    }

    #[test]
    fn negative_delay_overlaps_and_sums() {
        let mut seq = Sequence::new();
        seq.push(block(1.0, 0.25));
        seq.push_delay(-0.5);
        seq.push(block(1.0, 0.5));
        assert_eq!(seq.length(), 1.5);
        let sig = Signal::from(seq);
        assert!((sig.sample(0.25) - 0.25).abs() < EPS);
        assert!((sig.sample(0.75) - 0.75).abs() < EPS, "overlap sums");
        assert!((sig.sample(1.25) - 0.5).abs() < EPS);
    }

    #[test]
    fn head_rewind_overlaps() {
        let mut seq = Sequence::new();
        seq.push(block(2.0, 0.25));
        seq.set_head(0.5);
        seq.push(block(1.0, 0.5));
        let sig = Signal::from(seq);
        assert!((sig.sample(1.0) - 0.75).abs() < EPS);
        assert!((sig.sample(1.75) - 0.25).abs() < EPS);
    }

    #[test]
    fn insert_at_offset_keeps_head() {
        let mut seq = Sequence::new();
        seq.push(block(1.0, 1.0));
        let head = seq.head();
        seq.insert(block(4.0, 0.5), 2.0);
        assert_eq!(seq.head(), head);
        assert_eq!(seq.length(), 6.0);
    }

    #[test]
    fn clear_resets() {
        let mut seq = Sequence::new();
        seq.push(block(1.0, 1.0));
        seq.push_delay(1.0);
        seq.clear();
        assert_eq!(seq.head(), 0.0);
        assert_eq!(seq.length(), 0.0);
        assert_eq!(seq.key_count(), 0);
        assert_eq!(seq.sample_at(0.5), 0.0);
    }

    #[test]
    fn nested_sequence_is_opaque() {
        let mut inner = Sequence::new();
        inner.push(block(1.0, 0.5));
        let inner_head = inner.head();

        let mut outer = Sequence::new();
        outer.push_delay(1.0);
        outer.push(inner.clone());
        assert_eq!(outer.length(), 2.0);
        assert_eq!(inner.head(), inner_head);

        // mutating the original after composing does not affect the outer mix
        inner.push(block(5.0, 1.0));
        let sig = Signal::from(outer);
        assert!((sig.sample(1.5) - 0.5).abs() < EPS);
        assert_eq!(sig.sample(2.5), 0.0);
    }

    #[test]
    fn infinite_child_makes_sequence_infinite() {
        let mut seq = Sequence::new();
        seq.push(crate::oscillator::sine(100.0));
        assert_eq!(seq.length(), INFINITE);
    }

    #[test]
    fn shl_operators() {
        let seq = block(1.0, 1.0) << 0.5 << block(1.0, 1.0);
        assert_eq!(seq.length(), 2.5);
        let seq2 = block(1.0, 1.0) << (block(0.5, 1.0) << block(0.5, 1.0));
        assert_eq!(seq2.length(), 2.0);
    }

    #[test]
    fn child_window_is_half_open_at_the_end() {
        let mut seq = Sequence::new();
        seq.push(block(1.5, 0.3));
        seq.push(crate::envelope::asr(0.25, 0.5, 0.25).unwrap());
        // a finished child contributes nothing at exactly its end; only the
        // second child sounds there, and an asr starts from 0
        assert_eq!(seq.sample_at(1.5), 0.0);
        assert!((seq.sample_at(1.0) - 0.3).abs() < EPS);
        assert!((seq.sample_at(1.75) - 1.0).abs() < EPS);
    }

    #[test]
    fn sequence_roundtrip_sampling() {
        // seq.sample(L1 + x) == s2.sample(x)
        let s1 = block(1.5, 0.3);
        let s2 = crate::envelope::asr(0.25, 0.5, 0.25).unwrap();
        let mut seq = Sequence::new();
        seq.push(s1.clone());
        seq.push(s2.clone());
        assert_eq!(seq.length(), s1.length() + s2.length());
        for x in [0.0, 0.1, 0.5, 0.9] {
            assert!((seq.sample_at(1.5 + x) - s2.sample(x)).abs() < EPS, "x={x}");
        }
    }
}
