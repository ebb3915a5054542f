//! Spatial mapping of channels onto a virtual 1D/2D surface
//!
//! A `Spatializer` assigns positions to session channels, then drives each
//! channel's volume from its distance to a movable target point. Distance
//! can wrap around either axis for surfaces that close on themselves
//! (e.g. a bracelet of actuators). Channel gains follow
//! `roll_off(1 - clamp(d / radius)) * master_volume`.
//!
//! The spatializer binds to a session through a [`SessionHandle`], so it
//! keeps functioning across device open/close cycles without re-binding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::{clamp01, Curve};
use crate::error::{Error, Result};
use crate::session::{Session, SessionHandle};
use crate::signal::Signal;

/// Position on the spatializer surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// Distance along one axis, taking the shorter way around when the axis
/// wraps (wrap extent 0 disables wrapping).
fn axis_distance(a: f64, b: f64, wrap: f64) -> f64 {
    let d = (a - b).abs();
    if wrap > 0.0 {
        let d = d % wrap;
        d.min(wrap - d)
    } else {
        d
    }
}

fn distance(a: Point, b: Point, wrap: Point) -> f64 {
    let dx = axis_distance(a.x, b.x, wrap.x);
    let dy = axis_distance(a.y, b.y, wrap.y);
    (dx * dx + dy * dy).sqrt()
}

/// Row-major positions over the unit square; a single row or column is
/// centered at 0.5 on its degenerate axis.
fn grid_layout(rows: usize, cols: usize) -> impl Iterator<Item = (usize, Point)> {
    (0..rows).flat_map(move |r| {
        (0..cols).map(move |c| {
            let x = if cols > 1 {
                c as f64 / (cols - 1) as f64
            } else {
                0.5
            };
            let y = if rows > 1 {
                r as f64 / (rows - 1) as f64
            } else {
                0.5
            };
            (r * cols + c, Point { x, y })
        })
    })
}

pub struct Spatializer {
    handle: Option<SessionHandle>,
    positions: BTreeMap<usize, Point>,
    target: Point,
    radius: f64,
    roll_off: Curve,
    wrap: Point,
    volume: f64,
    pitch: f64,
    auto_update: bool,
}

impl Spatializer {
    pub fn new() -> Self {
        Spatializer {
            handle: None,
            positions: BTreeMap::new(),
            target: Point::default(),
            radius: 1.0,
            roll_off: Curve::Linear,
            wrap: Point::default(),
            volume: 1.0,
            pitch: 1.0,
            auto_update: true,
        }
    }

    /// Binds to `session`'s channel bank. An existing binding is replaced.
    pub fn bind(&mut self, session: &Session) {
        self.handle = Some(session.handle());
        self.apply_volumes();
        self.apply_pitch();
    }

    /// Unbinds, stopping mapped channels and restoring their volume and
    /// pitch to 1.
    pub fn unbind(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Ok(control) = handle.control() {
                for &channel in self.positions.keys() {
                    let _ = control.stop(channel);
                    let _ = control.set_volume(channel, 1.0);
                    let _ = control.set_pitch(channel, 1.0);
                }
            }
        }
    }

    pub fn is_bound(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_open())
    }

    /// Places `channel` at `position`, adding it to the mapping.
    pub fn set_position(&mut self, channel: usize, position: impl Into<Point>) {
        self.positions.insert(channel, position.into());
        if self.auto_update {
            self.apply_volumes();
        }
    }

    pub fn position(&self, channel: usize) -> Option<Point> {
        self.positions.get(&channel).copied()
    }

    /// Lays channels 0..rows*cols out on a uniform grid over the unit
    /// square, row-major. A single row or column is centered at 0.5.
    pub fn create_grid(&mut self, rows: usize, cols: usize) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidArgument(format!(
                "grid dimensions must be positive, got {rows}x{cols}"
            )));
        }
        let needed = rows * cols;
        let available = self.bound_channel_count()?;
        if needed > available {
            return Err(Error::InvalidChannel {
                channel: needed - 1,
                count: available,
            });
        }
        self.positions.clear();
        for (channel, point) in grid_layout(rows, cols) {
            self.positions.insert(channel, point);
        }
        debug!(rows, cols, "laid out spatializer grid");
        if self.auto_update {
            self.apply_volumes();
        }
        Ok(())
    }

    pub fn remove(&mut self, channel: usize) {
        self.positions.remove(&channel);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn has_channel(&self, channel: usize) -> bool {
        self.positions.contains_key(&channel)
    }

    pub fn channel_count(&self) -> usize {
        self.positions.len()
    }

    pub fn channels(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.keys().copied()
    }

    /// Moves the target point the falloff is computed against.
    pub fn set_target(&mut self, target: impl Into<Point>) {
        self.target = target.into();
        if self.auto_update {
            self.apply_volumes();
        }
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Sets the falloff radius; must be positive.
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        if !(radius > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "radius must be positive, got {radius}"
            )));
        }
        self.radius = radius;
        if self.auto_update {
            self.apply_volumes();
        }
        Ok(())
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_roll_off(&mut self, roll_off: Curve) {
        self.roll_off = roll_off;
        if self.auto_update {
            self.apply_volumes();
        }
    }

    pub fn roll_off(&self) -> Curve {
        self.roll_off
    }

    /// Wrap extents per axis; 0 disables wrapping on that axis.
    pub fn set_wrap(&mut self, wrap: impl Into<Point>) {
        self.wrap = wrap.into();
        if self.auto_update {
            self.apply_volumes();
        }
    }

    pub fn wrap(&self) -> Point {
        self.wrap
    }

    /// Master volume scaling every channel gain, clamped to [0, 1].
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = clamp01(volume);
        if self.auto_update {
            self.apply_volumes();
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Pitch forwarded to every mapped channel.
    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = pitch;
        self.apply_pitch();
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// When enabled (the default), any setter re-applies channel volumes.
    pub fn set_auto_update(&mut self, enabled: bool) {
        self.auto_update = enabled;
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// Gain a channel at `position` would currently receive.
    pub fn gain_at(&self, position: Point) -> f64 {
        let d = distance(position, self.target, self.wrap);
        if d > self.radius {
            return 0.0;
        }
        self.roll_off.evaluate(1.0 - clamp01(d / self.radius)) * self.volume
    }

    /// Recomputes and applies every mapped channel's volume. A no-op when
    /// no session is bound or the session is closed.
    pub fn update(&self) {
        self.apply_volumes();
    }

    /// Plays `signal` on every mapped channel.
    pub fn play(&self, signal: &Signal) -> Result<()> {
        let control = self.control()?;
        for &channel in self.positions.keys() {
            control.play(channel, signal.clone())?;
        }
        Ok(())
    }

    /// Stops every mapped channel.
    pub fn stop(&self) -> Result<()> {
        let control = self.control()?;
        for &channel in self.positions.keys() {
            control.stop(channel)?;
        }
        Ok(())
    }

    fn control(&self) -> Result<std::sync::Arc<crate::session::Control>> {
        let handle = self.handle.as_ref().ok_or(Error::Unbound)?;
        handle.control()
    }

    fn bound_channel_count(&self) -> Result<usize> {
        Ok(self.control()?.channel_count())
    }

    fn apply_volumes(&self) {
        if let Ok(control) = self.control() {
            for (&channel, &position) in &self.positions {
                let _ = control.set_volume(channel, self.gain_at(position));
            }
        }
    }

    fn apply_pitch(&self) {
        if let Ok(control) = self.control() {
            for &channel in self.positions.keys() {
                let _ = control.set_pitch(channel, self.pitch);
            }
        }
    }
}

impl Default for Spatializer {
    fn default() -> Self {
        Spatializer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn grid_positions_are_uniform_row_major() {
        let grid: Vec<_> = grid_layout(2, 3).collect();
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], (0, Point::new(0.0, 0.0)));
        assert_eq!(grid[2], (2, Point::new(1.0, 0.0)));
        assert_eq!(grid[4], (4, Point::new(0.5, 1.0)));
        assert_eq!(grid[5], (5, Point::new(1.0, 1.0)));
    }

    #[test]
    fn single_row_or_column_is_centered() {
        let row: Vec<_> = grid_layout(1, 3).collect();
        assert!(row.iter().all(|(_, p)| p.y == 0.5));
        assert_eq!(row[1].1, Point::new(0.5, 0.5));

        let col: Vec<_> = grid_layout(3, 1).collect();
        assert!(col.iter().all(|(_, p)| p.x == 0.5));
        assert_eq!(col[2].1, Point::new(0.5, 1.0));
    }

    #[test]
    fn create_grid_requires_a_bound_session() {
        let mut sp = Spatializer::new();
        assert!(matches!(sp.create_grid(2, 2), Err(Error::Unbound)));
        assert!(sp.create_grid(0, 4).is_err());
    }

    #[test]
    fn gain_is_full_at_target_and_zero_beyond_radius() {
        let mut sp = Spatializer::new();
        sp.set_target((0.5, 0.5));
        sp.set_radius(0.4).unwrap();
        assert!((sp.gain_at(Point::new(0.5, 0.5)) - 1.0).abs() < EPS);
        assert_eq!(sp.gain_at(Point::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn gain_falls_off_linearly_by_default() {
        let mut sp = Spatializer::new();
        sp.set_target((0.0, 0.0));
        sp.set_radius(1.0).unwrap();
        let near = sp.gain_at(Point::new(0.25, 0.0));
        let far = sp.gain_at(Point::new(0.75, 0.0));
        assert!((near - 0.75).abs() < EPS);
        assert!((far - 0.25).abs() < EPS);
    }

    #[test]
    fn master_volume_scales_gains() {
        let mut sp = Spatializer::new();
        sp.set_target((0.0, 0.0));
        sp.set_volume(0.5);
        assert!((sp.gain_at(Point::new(0.0, 0.0)) - 0.5).abs() < EPS);
        sp.set_volume(7.0);
        assert_eq!(sp.volume(), 1.0);
    }

    #[test]
    fn wrap_takes_the_shorter_way() {
        let mut sp = Spatializer::new();
        sp.set_wrap((1.0, 0.0));
        sp.set_target((0.05, 0.0));
        sp.set_radius(0.2).unwrap();
        // 0.95 is 0.10 away around the seam, not 0.90 across
        let g = sp.gain_at(Point::new(0.95, 0.0));
        assert!((g - 0.5).abs() < EPS, "wrapped gain was {g}");
        // without wrapping the same point is out of range
        sp.set_wrap((0.0, 0.0));
        assert_eq!(sp.gain_at(Point::new(0.95, 0.0)), 0.0);
    }

    #[test]
    fn rolloff_curve_shapes_gain() {
        let mut sp = Spatializer::new();
        sp.set_target((0.0, 0.0));
        sp.set_radius(1.0).unwrap();
        sp.set_roll_off(Curve::Smoothstep);
        // halfway out, smoothstep(0.5) == 0.5 still, but quarter out differs
        let g = sp.gain_at(Point::new(0.75, 0.0));
        assert!(g < 0.25, "smoothstep flattens the tail: {g}");
    }

    #[test]
    fn unbound_playback_is_rejected() {
        let sp = Spatializer::new();
        assert!(matches!(
            sp.play(&crate::source::scalar(1.0)),
            Err(Error::Unbound)
        ));
        assert!(matches!(sp.stop(), Err(Error::Unbound)));
        assert!(!sp.is_bound());
    }

    #[test]
    fn invalid_radius_is_rejected() {
        let mut sp = Spatializer::new();
        assert!(sp.set_radius(0.0).is_err());
        assert!(sp.set_radius(-1.0).is_err());
        assert!(sp.set_radius(f64::NAN).is_err());
    }

    #[test]
    fn mapping_management() {
        let mut sp = Spatializer::new();
        sp.set_position(3, (0.1, 0.2));
        sp.set_position(5, (0.9, 0.2));
        assert_eq!(sp.channel_count(), 2);
        assert!(sp.has_channel(3));
        assert_eq!(sp.channels().collect::<Vec<_>>(), vec![3, 5]);
        sp.remove(3);
        assert!(!sp.has_channel(3));
        sp.clear();
        assert_eq!(sp.channel_count(), 0);
    }
}
