//! Expansion, idle rotation and breathing for the particle group.
//!
//! The engine is the only thing that moves the group. Each frame it eases the
//! expansion factor toward its target, spins the group while no gesture is in
//! progress, and adds a small breathing pulse once the sphere has reformed.
//!
//! ```ignore
//! let mut engine = TransitionEngine::new(TransitionParams::default());
//! engine.toggle();
//! let frame = engine.update(time.elapsed(), 0.2, false);
//! field.set_scale(frame.scale);
//! ```

use glam::{Mat4, Vec3};

/// Tuning constants for [`TransitionEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionParams {
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
    /// Expansion factor of the reformed sphere.
    pub settled_scale: f32,
    /// Expansion factor of the dispersed cloud.
    pub expanded_scale: f32,
    /// Pulse runs only while `|current - settled| < pulse_epsilon`.
    pub pulse_epsilon: f32,
    /// Relative pulse amplitude.
    pub pulse_amplitude: f32,
    /// Pulse angular frequency in radians per second.
    pub pulse_frequency: f32,
    /// Yaw added per frame at rotation speed 1.0.
    pub yaw_step: f32,
    /// Peak pitch added per frame by the idle wobble.
    pub wobble_step: f32,
    /// Wobble angular frequency in radians per millisecond.
    pub wobble_frequency: f32,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            smoothing: 0.03,
            settled_scale: 1.0,
            expanded_scale: 6.0,
            pulse_epsilon: 0.05,
            pulse_amplitude: 0.02,
            pulse_frequency: 1.5,
            yaw_step: 0.005,
            wobble_step: 0.0005,
            wobble_frequency: 0.0005,
        }
    }
}

/// The engine's mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    pub current_expansion: f32,
    pub target_expansion: f32,
    /// Rotation about the Y axis, radians.
    pub yaw: f32,
    /// Rotation about the X axis, radians.
    pub pitch: f32,
}

/// Transform produced by one engine step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Uniform scale including the pulse.
    pub scale: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl FrameTransform {
    /// Group model matrix: pitch, then yaw, then scale.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Per-frame state evolution for the particle group.
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    params: TransitionParams,
    state: TransitionState,
}

impl TransitionEngine {
    /// A settled engine with zero rotation.
    pub fn new(params: TransitionParams) -> Self {
        Self {
            state: TransitionState {
                current_expansion: params.settled_scale,
                target_expansion: params.settled_scale,
                yaw: 0.0,
                pitch: 0.0,
            },
            params,
        }
    }

    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// Whether the target is the dispersed state.
    ///
    /// Reflects the target, not the eased value, so it flips immediately.
    pub fn is_expanded(&self) -> bool {
        self.state.target_expansion == self.params.expanded_scale
    }

    /// Flip the target between settled and dispersed.
    pub fn toggle(&mut self) {
        self.state.target_expansion = if self.is_expanded() {
            self.params.settled_scale
        } else {
            self.params.expanded_scale
        };
        log::debug!(
            "Expansion target now {} (current {:.3})",
            self.state.target_expansion,
            self.state.current_expansion
        );
    }

    /// Add a drag rotation to the group.
    pub fn apply_rotation_delta(&mut self, yaw: f32, pitch: f32) {
        self.state.yaw += yaw;
        self.state.pitch += pitch;
    }

    /// Advance one frame.
    ///
    /// `elapsed` is seconds since start. `rotation_speed` scales the idle
    /// spin; it is skipped entirely while `dragging`.
    pub fn update(&mut self, elapsed: f32, rotation_speed: f32, dragging: bool) -> FrameTransform {
        let p = &self.params;
        let s = &mut self.state;

        s.current_expansion += (s.target_expansion - s.current_expansion) * p.smoothing;
        let mut scale = s.current_expansion;

        if !dragging {
            s.yaw += rotation_speed * p.yaw_step;
            s.pitch += (elapsed * 1000.0 * p.wobble_frequency).sin() * p.wobble_step;
        }

        let settled = s.target_expansion == p.settled_scale;
        if settled && (s.current_expansion - p.settled_scale).abs() < p.pulse_epsilon {
            scale *= 1.0 + (elapsed * p.pulse_frequency).sin() * p.pulse_amplitude;
        }

        FrameTransform {
            scale,
            yaw: s.yaw,
            pitch: s.pitch,
        }
    }
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(TransitionParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn run(engine: &mut TransitionEngine, frames: usize) -> Vec<FrameTransform> {
        (0..frames)
            .map(|i| engine.update(i as f32 / 60.0, 1.0, false))
            .collect()
    }

    #[test]
    fn test_starts_settled() {
        let engine = TransitionEngine::default();
        assert!(!engine.is_expanded());
        assert_eq!(engine.state().current_expansion, 1.0);
    }

    #[test]
    fn test_expansion_converges_without_overshoot() {
        let mut engine = TransitionEngine::default();
        engine.toggle();
        assert!(engine.is_expanded());

        let mut last = engine.state().current_expansion;
        for _ in 0..400 {
            engine.update(0.0, 1.0, false);
            let current = engine.state().current_expansion;
            assert!(current <= 6.0);
            assert!(current >= last);
            last = current;
        }
        assert!((6.0 - last).abs() < 0.01);
    }

    #[test]
    fn test_no_pulse_while_dispersed() {
        let mut engine = TransitionEngine::default();
        engine.toggle();
        for frame in run(&mut engine, 200) {
            // Target is dispersed, so the gate is closed at every frame.
            assert!(frame.scale > 1.0);
        }
        let frame = engine.update(0.3, 1.0, false);
        assert_eq!(frame.scale, engine.state().current_expansion);
    }

    #[test]
    fn test_no_pulse_outside_band() {
        let mut engine = TransitionEngine::default();
        engine.toggle();
        run(&mut engine, 300);
        engine.toggle();

        // Contracting: outside the band the scale is exactly the eased value.
        loop {
            let frame = engine.update(1.0, 1.0, false);
            let current = engine.state().current_expansion;
            if (current - 1.0).abs() < 0.05 {
                break;
            }
            assert_eq!(frame.scale, current);
        }
    }

    #[test]
    fn test_pulse_amplitude_when_settled() {
        let mut engine = TransitionEngine::default();
        // sin(pi / 3 * 1.5) = sin(pi / 2) = 1, so the pulse is at its peak.
        let frame = engine.update(PI / 3.0, 0.0, false);
        assert!((frame.scale - 1.02).abs() < 1e-6);

        let frame = engine.update(PI, 0.0, false);
        assert!((frame.scale - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_returns_to_settled() {
        let mut engine = TransitionEngine::default();
        engine.toggle();
        run(&mut engine, 400);
        engine.toggle();
        assert!(!engine.is_expanded());

        let mut last = engine.state().current_expansion;
        for _ in 0..600 {
            engine.update(0.0, 1.0, false);
            let current = engine.state().current_expansion;
            assert!(current >= 1.0);
            assert!(current <= last);
            last = current;
        }
        assert!((last - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_idle_rotation_stops_while_dragging() {
        let mut engine = TransitionEngine::default();
        engine.update(0.0, 1.0, false);
        assert!((engine.state().yaw - 0.005).abs() < 1e-7);

        engine.update(0.5, 1.0, true);
        assert!((engine.state().yaw - 0.005).abs() < 1e-7);

        engine.update(0.5, 0.2, false);
        assert!((engine.state().yaw - 0.006).abs() < 1e-7);
    }

    #[test]
    fn test_drag_rotation_accumulates() {
        let mut engine = TransitionEngine::default();
        engine.apply_rotation_delta(0.03, -0.01);
        engine.apply_rotation_delta(0.01, 0.02);
        let frame = engine.update(0.0, 0.0, true);
        assert!((frame.yaw - 0.04).abs() < 1e-6);
        assert!((frame.pitch - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_model_matrix_scales_uniformly() {
        let frame = FrameTransform {
            scale: 6.0,
            yaw: 0.0,
            pitch: 0.0,
        };
        let p = frame.model_matrix().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!((p - Vec3::new(6.0, 12.0, 18.0)).length() < 1e-5);
    }
}
