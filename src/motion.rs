//! Drag rotation and spin-down momentum.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Per-frame multiplier applied to the angular velocity while idle.
pub const IDLE_DECAY: f64 = 0.99;
/// Angular velocity at start-up, enough to make the effect drift.
pub const INITIAL_DELTA_ANGLE: f64 = 0.001;
/// Nominal frame length (ms) that `delta_angle` is expressed against.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Angle of `point` around the centre of a `size` sized canvas.
pub fn pointer_angle(point: DVec2, size: DVec2) -> f64 {
    let d = point - size / 2.0;
    d.y.atan2(d.x)
}

/// Wraps an angle difference into `[-π, π)`.
fn wrap_delta(delta: f64) -> f64 {
    (delta + PI).rem_euclid(TAU) - PI
}

/// Global rotation state shared by the input handlers and the frame loop.
#[derive(Debug, Clone)]
pub struct Momentum {
    angle: f64,
    delta_angle: f64,
    pressed: bool,
    hold_angle: f64,
    last_interaction: f64,
}

impl Default for Momentum {
    fn default() -> Self {
        Self {
            angle: 0.0,
            delta_angle: INITIAL_DELTA_ANGLE,
            pressed: false,
            hold_angle: 0.0,
            last_interaction: 0.0,
        }
    }
}

impl Momentum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn delta_angle(&self) -> f64 {
        self.delta_angle
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn last_interaction(&self) -> f64 {
        self.last_interaction
    }

    /// Pointer went down at `pointer` (see [`pointer_angle`]).
    pub fn press(&mut self, pointer: f64, now: f64) {
        self.hold_angle = pointer;
        self.pressed = true;
        self.last_interaction = now;
    }

    /// Pointer moved while held: rotate by the swept angle and remember it
    /// as the current velocity. Ignored when not pressed.
    pub fn drag(&mut self, pointer: f64, now: f64) {
        if !self.pressed {
            return;
        }
        self.delta_angle = wrap_delta(pointer - self.hold_angle);
        self.hold_angle = pointer;
        self.angle += self.delta_angle;
        self.last_interaction = now;
    }

    /// Pointer (or touch) lifted. `still_down` is true while other touch
    /// points remain on the surface.
    pub fn release(&mut self, still_down: bool, now: f64) {
        self.pressed = still_down;
        self.last_interaction = now;
    }

    /// Advances the idle spin by `span_ms` and returns the rotation distance
    /// for this frame, which also drives the particle attraction.
    pub fn advance(&mut self, span_ms: f64) -> f64 {
        let dist = self.delta_angle / NOMINAL_FRAME_MS * span_ms;
        if !self.pressed && dist != 0.0 {
            self.angle += dist;
            self.delta_angle *= IDLE_DECAY;
        }
        dist
    }

    /// Freezes the spin.
    pub fn stop(&mut self) {
        self.delta_angle = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_angle_is_relative_to_centre() {
        let size = DVec2::new(200.0, 100.0);
        assert_eq!(pointer_angle(DVec2::new(150.0, 50.0), size), 0.0);
        assert!((pointer_angle(DVec2::new(100.0, 90.0), size) - PI / 2.0).abs() < 1e-12);
        assert!((pointer_angle(DVec2::new(0.0, 50.0), size) - PI).abs() < 1e-12);
    }

    #[test]
    fn drag_accumulates_angle_without_decay() {
        let mut m = Momentum::new();
        m.press(0.1, 5.0);
        m.drag(0.3, 6.0);
        m.drag(0.35, 7.0);
        assert!((m.angle() - 0.25).abs() < 1e-12);
        assert!((m.delta_angle() - 0.05).abs() < 1e-12);
        assert_eq!(m.last_interaction(), 7.0);

        // held: advancing neither moves nor decays
        let before = m.delta_angle();
        let dist = m.advance(NOMINAL_FRAME_MS);
        assert!((dist - before).abs() < 1e-12);
        assert_eq!(m.delta_angle(), before);
        assert!((m.angle() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn drag_without_press_is_ignored() {
        let mut m = Momentum::new();
        m.drag(1.0, 1.0);
        assert_eq!(m.angle(), 0.0);
        assert_eq!(m.delta_angle(), INITIAL_DELTA_ANGLE);
    }

    #[test]
    fn crossing_the_atan2_seam_takes_the_short_way() {
        let mut m = Momentum::new();
        m.press(PI - 0.05, 0.0);
        m.drag(-PI + 0.05, 1.0);
        assert!((m.delta_angle() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn idle_spin_decays_geometrically() {
        let mut m = Momentum::new();
        m.press(0.0, 0.0);
        m.drag(0.2, 1.0);
        m.release(false, 2.0);

        let mut prev = m.delta_angle();
        for _ in 0..500 {
            m.advance(NOMINAL_FRAME_MS);
            let cur = m.delta_angle();
            assert!((cur - prev * IDLE_DECAY).abs() < 1e-15);
            assert!(cur.abs() < prev.abs());
            assert!(cur != 0.0);
            prev = cur;
        }
    }

    #[test]
    fn zero_span_leaves_state_alone() {
        let mut m = Momentum::new();
        assert_eq!(m.advance(0.0), 0.0);
        assert_eq!(m.angle(), 0.0);
        assert_eq!(m.delta_angle(), INITIAL_DELTA_ANGLE);
    }

    #[test]
    fn touch_release_with_remaining_points_keeps_pressed() {
        let mut m = Momentum::new();
        m.press(0.0, 0.0);
        m.release(true, 1.0);
        assert!(m.is_pressed());
        m.release(false, 2.0);
        assert!(!m.is_pressed());
    }

    #[test]
    fn stop_freezes() {
        let mut m = Momentum::new();
        m.stop();
        assert_eq!(m.advance(16.0), 0.0);
        assert_eq!(m.angle(), 0.0);
    }
}
