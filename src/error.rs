//! Crate-wide error type
//!
//! Control-thread APIs return `Result<T, Error>`. The render thread never
//! propagates errors; it degrades to silence instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no device is open")]
    NotOpen,
    #[error("a device is already open")]
    AlreadyOpen,
    #[error("channel {channel} out of range (device has {count} channels)")]
    InvalidChannel { channel: usize, count: usize },
    #[error("no output device available")]
    NoDevice,
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("spatializer is not bound to a session")]
    Unbound,
    #[error("command queue full")]
    CommandQueueFull,
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("no library signal named '{0}'")]
    SignalNotFound(String),
    #[error("audio stream error: {0}")]
    Stream(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
