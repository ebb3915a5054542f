//! # Tactus
//!
//! Compositional signal synthesis and multi-channel rendering for haptic
//! and audio cues.
//!
//! The core abstraction is the [`Signal`]: a lazily evaluated function of
//! time with a finite or infinite length. Signals are built from sources
//! (oscillators, noise, ramps, recorded samples), shaped by envelopes, and
//! combined with ordinary arithmetic:
//!
//! ```
//! use tactus::prelude::*;
//!
//! // a 175 Hz tone shaped by an attack-sustain-release envelope
//! let cue = sine(175.0) * asr(0.1, 0.3, 0.1)?;
//! assert_eq!(cue.length(), 0.5);
//!
//! // sequences place signals on a timeline with the << operator
//! let pattern = cue.clone() << 0.25 << cue;
//! assert_eq!(pattern.length(), 1.25);
//! # Ok::<(), tactus::Error>(())
//! ```
//!
//! Playback goes through a [`Session`], which opens an output device and
//! renders one independent signal per channel. Commands reach the render
//! thread through a lock-free queue; volume, pitch and playback state are
//! shared through atomics, so control calls never block the audio callback.
//!
//! ```no_run
//! use tactus::prelude::*;
//!
//! let mut session = Session::new();
//! session.open()?;
//! session.play(0, sine(250.0) * asr(0.1, 0.1, 0.1)?)?;
//! # Ok::<(), tactus::Error>(())
//! ```
//!
//! A [`Spatializer`] maps channels onto a virtual surface and drives their
//! volumes from a movable target point, and the [`library`] module
//! persists signals by name and exchanges them as JSON, WAV or CSV.

pub mod curve;
pub mod device;
pub mod envelope;
pub mod error;
pub mod library;
pub mod oscillator;
pub mod process;
pub mod sequence;
pub mod session;
pub mod signal;
pub mod source;
pub mod spatializer;

pub use curve::Curve;
pub use device::Device;
pub use error::{Error, Result};
pub use sequence::Sequence;
pub use session::{Session, SessionHandle};
pub use signal::{Signal, INFINITE};
pub use spatializer::{Point, Spatializer};

/// Commonly used types and constructors.
pub mod prelude {
    pub use crate::curve::Curve;
    pub use crate::envelope::{
        adsr, adsr_with, asr, asr_with, envelope, envelope_with, exponential_decay,
        signal_envelope, KeyedEnvelope,
    };
    pub use crate::library::{
        export_signal, import_signal, load_signal, save_signal, FileFormat,
    };
    pub use crate::oscillator::{chirp, pwm, saw, sine, sine_fm, square, triangle};
    pub use crate::process::{repeat, repeat_with, stretch};
    pub use crate::sequence::Sequence;
    pub use crate::session::Session;
    pub use crate::signal::{Signal, INFINITE};
    pub use crate::source::{noise, ramp, ramp_to, samples, scalar, time};
    pub use crate::spatializer::{Point, Spatializer};
    pub use crate::{Error, Result};
}
