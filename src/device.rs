//! Output device enumeration
//!
//! Devices are queried through cpal across every available host API and
//! captured as plain descriptor snapshots. Descriptors are not live; a
//! [`crate::session::Session`] refreshes them on construction or on demand.

use cpal::traits::{DeviceTrait, HostTrait};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Sample rates probed when building a descriptor.
const STANDARD_SAMPLE_RATES: [u32; 13] = [
    8000, 9600, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000, 88200, 96000, 192000,
];

/// Snapshot descriptor of one output device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Stable index within the enumeration that produced this descriptor.
    pub index: usize,
    pub name: String,
    /// True for the system default output device.
    pub is_default: bool,
    /// Host API name (e.g. "ALSA", "JACK", "CoreAudio", "WASAPI").
    pub api_name: String,
    /// True for the default output device of its host API.
    pub is_api_default: bool,
    pub max_channels: u16,
    /// Standard sample rates the device reports support for.
    pub sample_rates: Vec<u32>,
    pub default_sample_rate: u32,
}

/// Builds descriptors for every output-capable device on every host.
pub(crate) fn enumerate() -> Vec<Device> {
    let default_host_id = cpal::default_host().id();
    let mut devices = Vec::new();
    let mut index = 0;

    for host_id in cpal::available_hosts() {
        let host = match cpal::host_from_id(host_id) {
            Ok(h) => h,
            Err(_) => continue,
        };
        let api_default = host
            .default_output_device()
            .and_then(|d| d.name().ok());
        let outputs = match host.output_devices() {
            Ok(o) => o,
            Err(_) => continue,
        };
        for device in outputs {
            let name = match device.name() {
                Ok(n) => n,
                Err(_) => continue,
            };
            let configs: Vec<_> = match device.supported_output_configs() {
                Ok(c) => c.collect(),
                Err(_) => continue,
            };
            if configs.is_empty() {
                continue;
            }
            let max_channels = configs.iter().map(|c| c.channels()).max().unwrap_or(0);
            let sample_rates = STANDARD_SAMPLE_RATES
                .iter()
                .copied()
                .filter(|&r| {
                    configs.iter().any(|c| {
                        c.min_sample_rate().0 <= r && r <= c.max_sample_rate().0
                    })
                })
                .collect();
            let default_sample_rate = device
                .default_output_config()
                .map(|c| c.sample_rate().0)
                .unwrap_or(44100);
            let is_api_default = api_default.as_deref() == Some(name.as_str());
            debug!(name, api = host_id.name(), max_channels, "found output device");
            devices.push(Device {
                index,
                name,
                is_default: is_api_default && host_id == default_host_id,
                api_name: host_id.name().to_string(),
                is_api_default,
                max_channels,
                sample_rates,
                default_sample_rate,
            });
            index += 1;
        }
    }
    devices
}

/// Re-resolves a descriptor to the live cpal device it was built from.
pub(crate) fn find_output(descriptor: &Device) -> Result<cpal::Device> {
    for host_id in cpal::available_hosts() {
        if host_id.name() != descriptor.api_name {
            continue;
        }
        let host = cpal::host_from_id(host_id)
            .map_err(|e| Error::DeviceUnavailable(e.to_string()))?;
        let outputs = host
            .output_devices()
            .map_err(|e| Error::DeviceUnavailable(e.to_string()))?;
        for device in outputs {
            if device.name().ok().as_deref() == Some(descriptor.name.as_str()) {
                return Ok(device);
            }
        }
    }
    Err(Error::DeviceUnavailable(descriptor.name.clone()))
}
