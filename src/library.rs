//! Saving, loading, importing and exporting signals
//!
//! Signals persist by name in a per-user library directory (binary encoded)
//! and can be exchanged with other tools through JSON, WAV and CSV files.
//! Exported audio renders the signal at a fixed rate; infinite signals are
//! cut off at a maximum duration.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::signal::Signal;
use crate::source;

/// Default render rate for audio export.
pub const DEFAULT_EXPORT_SAMPLE_RATE: f64 = 44100.0;
/// Exported duration cap; infinite signals are cut here.
pub const DEFAULT_EXPORT_MAX_LENGTH: f64 = 60.0;

const SIGNAL_EXTENSION: &str = "sig";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Resolve the format from the path extension.
    Auto,
    Binary,
    Json,
    Wav,
    Aiff,
    Csv,
}

fn resolve_format(path: &Path, format: FileFormat) -> Result<FileFormat> {
    if format != FileFormat::Auto {
        return Ok(format);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "sig" | "bin" => Ok(FileFormat::Binary),
        "json" => Ok(FileFormat::Json),
        "wav" | "wave" => Ok(FileFormat::Wav),
        "aiff" | "aif" => Ok(FileFormat::Aiff),
        "csv" | "txt" => Ok(FileFormat::Csv),
        other => Err(Error::UnsupportedFormat(format!(
            "unrecognized extension {other:?}"
        ))),
    }
}

/// The per-user signal library directory. Created on first save.
pub fn library_directory() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| Error::UnsupportedFormat("no user data directory".to_string()))?;
    Ok(base.join("tactus").join("library"))
}

fn signal_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name).with_extension(SIGNAL_EXTENSION)
}

/// Saves `signal` under `name` in the default library.
pub fn save_signal(signal: &Signal, name: &str) -> Result<()> {
    save_signal_in(signal, name, &library_directory()?)
}

/// Saves `signal` under `name` in `dir`, creating the directory if needed.
pub fn save_signal_in(signal: &Signal, name: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = signal_path(dir, name);
    let bytes = bincode::serialize(signal).map_err(|e| Error::Serialization(e.to_string()))?;
    fs::write(&path, bytes)?;
    info!(name, path = %path.display(), "saved signal");
    Ok(())
}

/// Loads the signal saved under `name` in the default library.
pub fn load_signal(name: &str) -> Result<Signal> {
    load_signal_from(name, &library_directory()?)
}

pub fn load_signal_from(name: &str, dir: &Path) -> Result<Signal> {
    let path = signal_path(dir, name);
    if !path.exists() {
        return Err(Error::SignalNotFound(name.to_string()));
    }
    let bytes = fs::read(&path)?;
    bincode::deserialize(&bytes).map_err(|e| Error::Serialization(e.to_string()))
}

/// Deletes the signal saved under `name` in the default library.
pub fn delete_signal(name: &str) -> Result<()> {
    delete_signal_in(name, &library_directory()?)
}

pub fn delete_signal_in(name: &str, dir: &Path) -> Result<()> {
    let path = signal_path(dir, name);
    if !path.exists() {
        return Err(Error::SignalNotFound(name.to_string()));
    }
    fs::remove_file(path)?;
    Ok(())
}

fn render(signal: &Signal, sample_rate: f64, max_length: f64) -> Vec<f32> {
    let length = signal.length().min(max_length);
    let count = (length * sample_rate) as usize;
    (0..count)
        .map(|i| signal.sample(i as f64 / sample_rate) as f32)
        .collect()
}

/// Exports `signal` to `path` with the default render settings.
pub fn export_signal(signal: &Signal, path: impl AsRef<Path>, format: FileFormat) -> Result<()> {
    export_signal_with(
        signal,
        path,
        format,
        DEFAULT_EXPORT_SAMPLE_RATE,
        DEFAULT_EXPORT_MAX_LENGTH,
    )
}

/// Exports `signal` to `path`. Binary and JSON keep the signal's structure;
/// WAV and CSV render it at `sample_rate` for up to `max_length` seconds.
pub fn export_signal_with(
    signal: &Signal,
    path: impl AsRef<Path>,
    format: FileFormat,
    sample_rate: f64,
    max_length: f64,
) -> Result<()> {
    let path = path.as_ref();
    if !(sample_rate > 0.0) || !(max_length > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "export needs positive sample rate and max length, got {sample_rate}, {max_length}"
        )));
    }
    match resolve_format(path, format)? {
        FileFormat::Auto => unreachable!(),
        FileFormat::Binary => {
            let bytes =
                bincode::serialize(signal).map_err(|e| Error::Serialization(e.to_string()))?;
            fs::write(path, bytes)?;
        }
        FileFormat::Json => {
            let json = serde_json::to_string_pretty(signal)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            fs::write(path, json)?;
        }
        FileFormat::Wav => {
            let spec = hound::WavSpec {
                channels: 1,
                sample_rate: sample_rate as u32,
                bits_per_sample: 32,
                sample_format: hound::SampleFormat::Float,
            };
            let mut writer = hound::WavWriter::create(path, spec)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            for s in render(signal, sample_rate, max_length) {
                writer
                    .write_sample(s)
                    .map_err(|e| Error::Serialization(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| Error::Serialization(e.to_string()))?;
        }
        FileFormat::Aiff => {
            return Err(Error::UnsupportedFormat("AIFF export".to_string()));
        }
        FileFormat::Csv => {
            let mut out = String::new();
            for s in render(signal, sample_rate, max_length) {
                out.push_str(&format!("{s}\n"));
            }
            fs::write(path, out)?;
        }
    }
    info!(path = %path.display(), "exported signal");
    Ok(())
}

/// Imports a signal from `path`. Binary and JSON restore the saved
/// structure; WAV yields a sample-backed signal at the file's own rate
/// (first channel only).
pub fn import_signal(path: impl AsRef<Path>, format: FileFormat) -> Result<Signal> {
    let path = path.as_ref();
    match resolve_format(path, format)? {
        FileFormat::Auto => unreachable!(),
        FileFormat::Binary => {
            let bytes = fs::read(path)?;
            bincode::deserialize(&bytes).map_err(|e| Error::Serialization(e.to_string()))
        }
        FileFormat::Json => {
            let json = fs::read_to_string(path)?;
            serde_json::from_str(&json).map_err(|e| Error::Serialization(e.to_string()))
        }
        FileFormat::Wav => {
            let mut reader =
                hound::WavReader::open(path).map_err(|e| Error::Serialization(e.to_string()))?;
            let spec = reader.spec();
            let channels = spec.channels.max(1) as usize;
            let data: Vec<f32> = match spec.sample_format {
                hound::SampleFormat::Float => reader
                    .samples::<f32>()
                    .step_by(channels)
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| Error::Serialization(e.to_string()))?,
                hound::SampleFormat::Int => {
                    let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                    reader
                        .samples::<i32>()
                        .step_by(channels)
                        .map(|s| s.map(|v| v as f32 * scale))
                        .collect::<std::result::Result<_, _>>()
                        .map_err(|e| Error::Serialization(e.to_string()))?
                }
            };
            Ok(source::samples(data, spec.sample_rate as f64))
        }
        FileFormat::Aiff => Err(Error::UnsupportedFormat("AIFF import".to_string())),
        FileFormat::Csv => Err(Error::UnsupportedFormat("CSV import".to_string())),
    }
}
