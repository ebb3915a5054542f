//! Playback session
//!
//! A `Session` owns at most one open output device and a bank of per-channel
//! playback slots. Control-thread commands (play/stop) travel to the cpal
//! render callback through a lock-free queue drained at buffer boundaries;
//! volume, pitch, pause state and read-back values (active flag, peak level,
//! cpu load) are published through atomics. Signal graphs are immutable once
//! handed to `play`, so the render thread samples them without locks, and
//! the render path never panics - inconsistencies degrade to silence.
//!
//! The control block for an open device sits behind an `ArcSwapOption` so
//! that bound collaborators (see [`crate::spatializer`]) keep working across
//! open/close cycles without re-binding.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use cpal::traits::{DeviceTrait, StreamTrait};
use crossbeam_queue::ArrayQueue;
use tracing::{error, info, warn};

use crate::device::{self, Device};
use crate::error::{Error, Result};
use crate::signal::Signal;

const COMMAND_QUEUE_SIZE: usize = 256;

pub(crate) enum Command {
    Play { channel: usize, signal: Signal },
    Stop { channel: usize },
}

fn store_f32(atomic: &AtomicU32, value: f32) {
    atomic.store(value.to_bits(), Ordering::Relaxed);
}

fn load_f32(atomic: &AtomicU32) -> f32 {
    f32::from_bits(atomic.load(Ordering::Relaxed))
}

/// Per-channel state shared between the control and render threads.
pub(crate) struct ChannelShared {
    volume: AtomicU32,
    pitch: AtomicU32,
    paused: AtomicBool,
    active: AtomicBool,
    level: AtomicU32,
}

impl ChannelShared {
    fn new() -> Self {
        ChannelShared {
            volume: AtomicU32::new(1.0f32.to_bits()),
            pitch: AtomicU32::new(1.0f32.to_bits()),
            paused: AtomicBool::new(false),
            active: AtomicBool::new(false),
            level: AtomicU32::new(0),
        }
    }
}

/// Control block of one open device: command queue plus channel atomics.
pub(crate) struct Control {
    commands: ArrayQueue<Command>,
    channels: Box<[ChannelShared]>,
    sample_rate: f64,
    cpu_load: AtomicU32,
}

impl Control {
    pub(crate) fn new(channels: usize, sample_rate: f64) -> Self {
        Control {
            commands: ArrayQueue::new(COMMAND_QUEUE_SIZE),
            channels: (0..channels).map(|_| ChannelShared::new()).collect(),
            sample_rate,
            cpu_load: AtomicU32::new(0),
        }
    }

    fn channel(&self, channel: usize) -> Result<&ChannelShared> {
        self.channels.get(channel).ok_or(Error::InvalidChannel {
            channel,
            count: self.channels.len(),
        })
    }

    fn push_command(&self, command: Command) -> Result<()> {
        if self.commands.push(command).is_err() {
            warn!("render command queue full, command dropped");
            return Err(Error::CommandQueueFull);
        }
        Ok(())
    }

    pub(crate) fn play(&self, channel: usize, signal: Signal) -> Result<()> {
        let shared = self.channel(channel)?;
        self.push_command(Command::Play { channel, signal })?;
        shared.paused.store(false, Ordering::Relaxed);
        shared.active.store(true, Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn stop(&self, channel: usize) -> Result<()> {
        let shared = self.channel(channel)?;
        self.push_command(Command::Stop { channel })?;
        shared.paused.store(false, Ordering::Relaxed);
        shared.active.store(false, Ordering::Relaxed);
        store_f32(&shared.level, 0.0);
        Ok(())
    }

    pub(crate) fn pause(&self, channel: usize) -> Result<()> {
        self.channel(channel)?.paused.store(true, Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn resume(&self, channel: usize) -> Result<()> {
        self.channel(channel)?
            .paused
            .store(false, Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn set_volume(&self, channel: usize, volume: f64) -> Result<()> {
        store_f32(
            &self.channel(channel)?.volume,
            volume.clamp(0.0, 1.0) as f32,
        );
        Ok(())
    }

    pub(crate) fn volume(&self, channel: usize) -> Result<f64> {
        Ok(load_f32(&self.channel(channel)?.volume) as f64)
    }

    pub(crate) fn set_pitch(&self, channel: usize, pitch: f64) -> Result<()> {
        store_f32(&self.channel(channel)?.pitch, pitch as f32);
        Ok(())
    }

    pub(crate) fn pitch(&self, channel: usize) -> Result<f64> {
        Ok(load_f32(&self.channel(channel)?.pitch) as f64)
    }

    pub(crate) fn is_playing(&self, channel: usize) -> Result<bool> {
        let shared = self.channel(channel)?;
        Ok(shared.active.load(Ordering::Relaxed) && !shared.paused.load(Ordering::Relaxed))
    }

    pub(crate) fn is_paused(&self, channel: usize) -> Result<bool> {
        Ok(self.channel(channel)?.paused.load(Ordering::Relaxed))
    }

    pub(crate) fn level(&self, channel: usize) -> Result<f64> {
        Ok(load_f32(&self.channel(channel)?.level) as f64)
    }

    pub(crate) fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub(crate) fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub(crate) fn cpu_load(&self) -> f64 {
        load_f32(&self.cpu_load) as f64
    }
}

struct RenderChannel {
    signal: Option<Signal>,
    time: f64,
    last_volume: f32,
    last_pitch: f32,
}

/// Render-thread side of a control block. Owns the elapsed-time cursors and
/// the assigned signals; everything else is read from the shared atomics
/// once per buffer.
pub(crate) struct RenderBank {
    control: Arc<Control>,
    channels: Vec<RenderChannel>,
    dt: f64,
}

impl RenderBank {
    pub(crate) fn new(control: Arc<Control>) -> Self {
        let count = control.channel_count();
        RenderBank {
            dt: 1.0 / control.sample_rate(),
            channels: (0..count)
                .map(|_| RenderChannel {
                    signal: None,
                    time: 0.0,
                    last_volume: 1.0,
                    last_pitch: 1.0,
                })
                .collect(),
            control,
        }
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.control.commands.pop() {
            match command {
                Command::Play { channel, signal } => {
                    if let Some(chan) = self.channels.get_mut(channel) {
                        chan.signal = Some(signal);
                        chan.time = 0.0;
                    }
                }
                Command::Stop { channel } => {
                    if let Some(chan) = self.channels.get_mut(channel) {
                        chan.signal = None;
                        chan.time = 0.0;
                    }
                }
            }
        }
    }

    /// Fills one interleaved output buffer. `out_channels` is the device
    /// frame width; session channels beyond it are left silent.
    pub(crate) fn fill(&mut self, buffer: &mut [f32], out_channels: usize) {
        self.drain_commands();
        buffer.fill(0.0);
        if out_channels == 0 {
            return;
        }
        let frames = buffer.len() / out_channels;
        if frames == 0 {
            return;
        }
        for c in 0..self.channels.len().min(out_channels) {
            let shared = &self.control.channels[c];
            let volume = load_f32(&shared.volume);
            let pitch = load_f32(&shared.pitch);
            let chan = &mut self.channels[c];

            let signal = match (&chan.signal, shared.paused.load(Ordering::Relaxed)) {
                (Some(signal), false) => signal.clone(),
                _ => {
                    chan.last_volume = volume;
                    chan.last_pitch = pitch;
                    store_f32(&shared.level, 0.0);
                    continue;
                }
            };

            // volume and pitch ramp linearly across the buffer toward the
            // most recently published targets
            let volume_incr = (volume - chan.last_volume) / frames as f32;
            let pitch_incr = (pitch - chan.last_pitch) / frames as f32;
            let mut v = chan.last_volume;
            let mut p = chan.last_pitch;
            let mut peak = 0.0f32;
            for f in 0..frames {
                v += volume_incr;
                p += pitch_incr;
                let sample = signal.sample(chan.time) as f32 * v;
                buffer[f * out_channels + c] = sample;
                peak = peak.max(sample.abs());
                chan.time += self.dt * p as f64;
            }
            chan.last_volume = volume;
            chan.last_pitch = pitch;
            store_f32(&shared.level, peak);

            if chan.time > signal.length() {
                chan.signal = None;
                chan.time = 0.0;
                shared.active.store(false, Ordering::Relaxed);
            }
        }
    }
}

struct Shared {
    control: ArcSwapOption<Control>,
}

/// Cloneable handle onto a session's (possibly not yet open) control block.
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl SessionHandle {
    pub(crate) fn control(&self) -> Result<Arc<Control>> {
        self.shared.control.load_full().ok_or(Error::NotOpen)
    }

    pub(crate) fn is_open(&self) -> bool {
        self.shared.control.load().is_some()
    }
}

/// Audio device playback context.
pub struct Session {
    devices: Vec<Device>,
    shared: Arc<Shared>,
    stream: Option<cpal::Stream>,
    current: Option<Device>,
}

impl Session {
    /// Creates a session and enumerates the available output devices.
    pub fn new() -> Self {
        let devices = device::enumerate();
        info!(count = devices.len(), "enumerated output devices");
        Session {
            devices,
            shared: Arc::new(Shared {
                control: ArcSwapOption::from(None),
            }),
            stream: None,
            current: None,
        }
    }

    /// Re-queries the device list (the list is otherwise a snapshot).
    pub fn refresh_devices(&mut self) {
        self.devices = device::enumerate();
    }

    pub fn available_devices(&self) -> &[Device] {
        &self.devices
    }

    /// The system default output device, if any.
    pub fn default_device(&self) -> Option<&Device> {
        self.devices.iter().find(|d| d.is_default)
    }

    /// The device currently open, if any.
    pub fn current_device(&self) -> Option<&Device> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.shared.control.load().is_some()
    }

    /// Opens the system default device with all its channels.
    pub fn open(&mut self) -> Result<()> {
        let descriptor = self.default_device().cloned().ok_or(Error::NoDevice)?;
        self.open_internal(descriptor, u16::MAX, 0)
    }

    /// Opens a device by enumeration index.
    pub fn open_device(&mut self, index: usize) -> Result<()> {
        let descriptor = self.descriptor_by_index(index)?;
        self.open_internal(descriptor, u16::MAX, 0)
    }

    /// Opens a device by index with an explicit channel count and sample
    /// rate (0 selects the device default rate).
    pub fn open_with(&mut self, index: usize, channels: u16, sample_rate: u32) -> Result<()> {
        let descriptor = self.descriptor_by_index(index)?;
        self.open_internal(descriptor, channels, sample_rate)
    }

    /// Opens the default device of the given host API.
    pub fn open_api(&mut self, api_name: &str) -> Result<()> {
        let descriptor = self
            .devices
            .iter()
            .find(|d| d.api_name == api_name && d.is_api_default)
            .cloned()
            .ok_or_else(|| Error::DeviceUnavailable(api_name.to_string()))?;
        self.open_internal(descriptor, u16::MAX, 0)
    }

    /// Opens a device by name within a host API.
    pub fn open_named(&mut self, name: &str, api_name: &str) -> Result<()> {
        let descriptor = self
            .devices
            .iter()
            .find(|d| d.name == name && d.api_name == api_name)
            .cloned()
            .ok_or_else(|| Error::DeviceUnavailable(format!("{name} ({api_name})")))?;
        self.open_internal(descriptor, u16::MAX, 0)
    }

    fn descriptor_by_index(&self, index: usize) -> Result<Device> {
        self.devices
            .iter()
            .find(|d| d.index == index)
            .cloned()
            .ok_or_else(|| Error::DeviceUnavailable(format!("index {index}")))
    }

    fn open_internal(
        &mut self,
        descriptor: Device,
        channels: u16,
        sample_rate: u32,
    ) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }
        let cpal_device = device::find_output(&descriptor)?;
        let sample_rate = if sample_rate == 0 {
            descriptor.default_sample_rate
        } else {
            sample_rate
        };
        let channels = channels.min(descriptor.max_channels).max(1);
        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        let sample_format = cpal_device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?
            .sample_format();

        let control = Arc::new(Control::new(channels as usize, sample_rate as f64));
        let bank = RenderBank::new(control.clone());
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&cpal_device, &config, bank),
            cpal::SampleFormat::I16 => build_stream::<i16>(&cpal_device, &config, bank),
            cpal::SampleFormat::U16 => build_stream::<u16>(&cpal_device, &config, bank),
            other => Err(Error::Stream(format!("unsupported sample format {other}"))),
        }?;
        stream.play().map_err(|e| Error::Stream(e.to_string()))?;

        info!(
            device = descriptor.name,
            api = descriptor.api_name,
            channels,
            sample_rate,
            "opened output device"
        );
        self.shared.control.store(Some(control));
        self.stream = Some(stream);
        self.current = Some(descriptor);
        Ok(())
    }

    /// Closes the open device, stopping all channels.
    pub fn close(&mut self) -> Result<()> {
        if !self.is_open() {
            return Err(Error::NotOpen);
        }
        self.shared.control.store(None);
        self.stream = None;
        self.current = None;
        info!("closed output device");
        Ok(())
    }

    fn control(&self) -> Result<Arc<Control>> {
        self.shared.control.load_full().ok_or(Error::NotOpen)
    }

    /// Plays `signal` on `channel`, replacing whatever was playing and
    /// resetting the channel's elapsed time.
    pub fn play(&self, channel: usize, signal: Signal) -> Result<()> {
        self.control()?.play(channel, signal)
    }

    /// Plays `signal` on every channel.
    pub fn play_all(&self, signal: &Signal) -> Result<()> {
        let control = self.control()?;
        for channel in 0..control.channel_count() {
            control.play(channel, signal.clone())?;
        }
        Ok(())
    }

    pub fn stop(&self, channel: usize) -> Result<()> {
        self.control()?.stop(channel)
    }

    pub fn stop_all(&self) -> Result<()> {
        let control = self.control()?;
        for channel in 0..control.channel_count() {
            control.stop(channel)?;
        }
        Ok(())
    }

    pub fn pause(&self, channel: usize) -> Result<()> {
        self.control()?.pause(channel)
    }

    pub fn pause_all(&self) -> Result<()> {
        let control = self.control()?;
        for channel in 0..control.channel_count() {
            control.pause(channel)?;
        }
        Ok(())
    }

    pub fn resume(&self, channel: usize) -> Result<()> {
        self.control()?.resume(channel)
    }

    pub fn resume_all(&self) -> Result<()> {
        let control = self.control()?;
        for channel in 0..control.channel_count() {
            control.resume(channel)?;
        }
        Ok(())
    }

    /// True while an unfinished, unpaused signal is assigned to `channel`.
    pub fn is_playing(&self, channel: usize) -> Result<bool> {
        self.control()?.is_playing(channel)
    }

    pub fn is_paused(&self, channel: usize) -> Result<bool> {
        self.control()?.is_paused(channel)
    }

    /// Sets channel volume, clamped to [0, 1].
    pub fn set_volume(&self, channel: usize, volume: f64) -> Result<()> {
        self.control()?.set_volume(channel, volume)
    }

    pub fn volume(&self, channel: usize) -> Result<f64> {
        self.control()?.volume(channel)
    }

    /// Sets channel pitch as a time-scale factor (2.0 plays twice as fast).
    pub fn set_pitch(&self, channel: usize, pitch: f64) -> Result<()> {
        self.control()?.set_pitch(channel, pitch)
    }

    pub fn pitch(&self, channel: usize) -> Result<f64> {
        self.control()?.pitch(channel)
    }

    /// Peak absolute amplitude of the last rendered buffer on `channel`.
    pub fn level(&self, channel: usize) -> Result<f64> {
        self.control()?.level(channel)
    }

    /// Channel count of the open device, or 0 when closed.
    pub fn channel_count(&self) -> usize {
        self.control().map(|c| c.channel_count()).unwrap_or(0)
    }

    /// Sample rate of the open device, or 0 when closed.
    pub fn sample_rate(&self) -> f64 {
        self.control().map(|c| c.sample_rate()).unwrap_or(0.0)
    }

    /// Smoothed fraction of the render budget spent in the callback.
    pub fn cpu_load(&self) -> f64 {
        self.control().map(|c| c.cpu_load()).unwrap_or(0.0)
    }

    /// Handle for collaborators (e.g. a spatializer) that must outlive
    /// open/close cycles.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            shared: self.shared.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut bank: RenderBank,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0 as f64;
    let control = bank.control.clone();
    let mut scratch: Vec<f32> = vec![0.0; 16384];
    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let start = std::time::Instant::now();
                if scratch.len() < data.len() {
                    scratch.resize(data.len(), 0.0);
                }
                let out = &mut scratch[..data.len()];
                bank.fill(out, channels);
                for (dst, src) in data.iter_mut().zip(out.iter()) {
                    *dst = T::from_sample(*src);
                }
                let frames = data.len() / channels.max(1);
                let budget = frames as f64 / sample_rate;
                if budget > 0.0 {
                    let load = start.elapsed().as_secs_f64() / budget;
                    let smoothed = load_f32(&control.cpu_load) as f64 * 0.9 + load * 0.1;
                    store_f32(&control.cpu_load, smoothed as f32);
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )
        .map_err(|e| Error::Stream(e.to_string()))?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::envelope_with;
    use crate::source::{scalar, time};

    const SR: f64 = 44100.0;

    fn offline(channels: usize) -> (Arc<Control>, RenderBank) {
        let control = Arc::new(Control::new(channels, SR));
        let bank = RenderBank::new(control.clone());
        (control, bank)
    }

    fn render(bank: &mut RenderBank, frames: usize, channels: usize) -> Vec<f32> {
        let mut buffer = vec![0.0f32; frames * channels];
        bank.fill(&mut buffer, channels);
        buffer
    }

    #[test]
    fn finite_signal_stops_naturally() {
        let (control, mut bank) = offline(1);
        // 10 ms signal is 441 frames at 44.1 kHz
        control
            .play(0, envelope_with(0.01, 1.0).unwrap())
            .unwrap();
        assert!(control.is_playing(0).unwrap());
        render(&mut bank, 1024, 1);
        assert!(!control.is_playing(0).unwrap());
        // subsequent buffers stay silent
        let buffer = render(&mut bank, 64, 1);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn stop_is_immediate() {
        let (control, mut bank) = offline(1);
        control.play(0, scalar(1.0)).unwrap();
        render(&mut bank, 64, 1);
        assert!(control.is_playing(0).unwrap());
        control.stop(0).unwrap();
        assert!(!control.is_playing(0).unwrap());
        let buffer = render(&mut bank, 64, 1);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn play_interrupts_and_resets_cursor() {
        let (control, mut bank) = offline(1);
        control.play(0, time()).unwrap();
        render(&mut bank, 4410, 1);
        // replace with a fresh time signal: cursor restarts near 0
        control.play(0, time()).unwrap();
        let buffer = render(&mut bank, 64, 1);
        assert!(buffer[1] < 0.01, "cursor was not reset: {}", buffer[1]);
    }

    #[test]
    fn pause_silences_and_resume_continues() {
        let (control, mut bank) = offline(1);
        control.play(0, scalar(1.0)).unwrap();
        let buffer = render(&mut bank, 64, 1);
        assert!(buffer.iter().any(|s| *s != 0.0));

        control.pause(0).unwrap();
        assert!(control.is_paused(0).unwrap());
        assert!(!control.is_playing(0).unwrap());
        let buffer = render(&mut bank, 64, 1);
        assert!(buffer.iter().all(|s| *s == 0.0));

        control.resume(0).unwrap();
        assert!(control.is_playing(0).unwrap());
        let buffer = render(&mut bank, 64, 1);
        assert!(buffer.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn volume_ramps_to_target() {
        let (control, mut bank) = offline(1);
        control.play(0, scalar(1.0)).unwrap();
        control.set_volume(0, 0.5).unwrap();
        let frames = 100;
        let buffer = render(&mut bank, frames, 1);
        assert!((buffer[frames - 1] - 0.5).abs() < 1e-4);
        // ramp is monotonic from the previous volume (1.0)
        assert!(buffer[0] > buffer[frames - 1]);
        // next buffer sits at the target
        let buffer = render(&mut bank, 16, 1);
        assert!((buffer[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn volume_is_clamped() {
        let (control, _) = offline(1);
        control.set_volume(0, 3.0).unwrap();
        assert_eq!(control.volume(0).unwrap(), 1.0);
        control.set_volume(0, -1.0).unwrap();
        assert_eq!(control.volume(0).unwrap(), 0.0);
    }

    #[test]
    fn pitch_scales_elapsed_time() {
        let (fast_control, mut fast_bank) = offline(1);
        let (slow_control, mut slow_bank) = offline(1);
        fast_control.play(0, time()).unwrap();
        slow_control.play(0, time()).unwrap();
        fast_control.set_pitch(0, 2.0).unwrap();
        // first buffer ramps the pitch in; second runs at full factor
        render(&mut fast_bank, 512, 1);
        render(&mut slow_bank, 512, 1);
        let fast = render(&mut fast_bank, 512, 1);
        let slow = render(&mut slow_bank, 512, 1);
        // the first buffer ramps pitch in, so the overall ratio sits a bit
        // under 2
        assert!(fast[511] > slow[511] * 1.6);
    }

    #[test]
    fn level_reports_peak() {
        let (control, mut bank) = offline(1);
        control.play(0, scalar(0.5)).unwrap();
        render(&mut bank, 64, 1);
        assert!((control.level(0).unwrap() - 0.5).abs() < 1e-4);
        control.stop(0).unwrap();
        assert_eq!(control.level(0).unwrap(), 0.0);
    }

    #[test]
    fn channels_mix_into_interleaved_frames() {
        let (control, mut bank) = offline(2);
        control.play(0, scalar(0.25)).unwrap();
        control.play(1, scalar(0.75)).unwrap();
        let buffer = render(&mut bank, 32, 2);
        assert!((buffer[30] - 0.25).abs() < 1e-5);
        assert!((buffer[31] - 0.75).abs() < 1e-5);
    }

    #[test]
    fn invalid_channel_is_rejected() {
        let (control, _) = offline(2);
        assert!(matches!(
            control.play(2, scalar(1.0)),
            Err(Error::InvalidChannel { channel: 2, count: 2 })
        ));
        assert!(control.set_volume(5, 0.5).is_err());
    }

    #[test]
    fn session_requires_open_device() {
        let session = Session::new();
        assert!(!session.is_open());
        assert!(matches!(session.play(0, scalar(1.0)), Err(Error::NotOpen)));
        assert!(matches!(session.stop(0), Err(Error::NotOpen)));
        assert!(matches!(session.is_playing(0), Err(Error::NotOpen)));
        assert_eq!(session.channel_count(), 0);
        assert_eq!(session.sample_rate(), 0.0);
        assert_eq!(session.cpu_load(), 0.0);
    }

    #[test]
    fn close_without_open_fails() {
        let mut session = Session::new();
        assert!(matches!(session.close(), Err(Error::NotOpen)));
    }
}
