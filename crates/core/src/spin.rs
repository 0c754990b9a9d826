//! Per-frame animation state for the demo tetrahedron.
//!
//! Tracks a bouncing horizontal offset and a wrapping rotation angle. The
//! state is advanced once per rendered frame and turned into a model
//! matrix with [`SpinState::model_matrix`]. Pure math over `glam`; no GL
//! dependency.

use glam::{Mat4, Vec3};

use crate::config::SpinSettings;

/// Bounce-and-spin animation state.
///
/// The offset walks between `-max_offset` and `+max_offset` in
/// `offset_increment` steps, flipping direction when the rim is reached
/// (one step of overshoot is allowed, then the walk turns around). The
/// angle grows by `degrees_per_frame` and wraps at 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    settings: SpinSettings,
    moving_right: bool,
    offset: f32,
    angle_deg: f32,
}

impl SpinState {
    /// Creates a state at rest: zero offset, zero angle, moving right.
    pub fn new(settings: SpinSettings) -> Self {
        Self {
            settings,
            moving_right: true,
            offset: 0.0,
            angle_deg: 0.0,
        }
    }

    /// Advances the animation by one frame.
    pub fn advance(&mut self) {
        if self.moving_right {
            self.offset += self.settings.offset_increment;
        } else {
            self.offset -= self.settings.offset_increment;
        }

        if self.offset.abs() >= self.settings.max_offset {
            self.moving_right = !self.moving_right;
        }

        self.angle_deg += self.settings.degrees_per_frame;
        while self.angle_deg >= 360.0 {
            self.angle_deg -= 360.0;
        }
    }

    /// Builds the model matrix: translate by the offset, rotate around Y,
    /// then apply the configured uniform scale.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.offset, 0.0, 0.0))
            * Mat4::from_rotation_y(self.angle_deg.to_radians())
            * Mat4::from_scale(Vec3::splat(self.settings.scale))
    }

    /// Current rotation angle in degrees, always in `[0, 360)`.
    pub fn angle_degrees(&self) -> f32 {
        self.angle_deg
    }

    /// Current horizontal offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The settings this state was created with.
    pub fn settings(&self) -> SpinSettings {
        self.settings
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::new(SpinSettings::default())
    }
}
