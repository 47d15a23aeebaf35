//! First-person player controller: walking and looking.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Raw movement keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    /// W
    pub forward: bool,
    /// S
    pub back: bool,
    /// A
    pub left: bool,
    /// D
    pub right: bool,
}

impl MovementIntent {
    /// No keys held.
    pub const NONE: Self = Self {
        forward: false,
        back: false,
        left: false,
        right: false,
    };

    /// True when no key is held.
    pub fn is_idle(&self) -> bool {
        *self == Self::NONE
    }
}

/// Player pose. Angles are in degrees; yaw 0 faces -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// World position.
    pub position: Vec3,
    /// Heading around +Y, degrees.
    pub yaw: f32,
    /// Camera pitch, degrees (positive looks up).
    pub pitch: f32,
}

impl Player {
    /// Player at `position` facing -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Ground-plane forward vector for the current yaw.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
    }

    /// Ground-plane right vector for the current yaw.
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    /// Translation this frame for the held keys: the normalized sum of the
    /// basis directions scaled by `speed * dt`. Opposing keys cancel.
    pub fn movement(&self, intent: MovementIntent, speed: f32, dt: f32) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if intent.forward {
            dir += self.forward();
        }
        if intent.back {
            dir -= self.forward();
        }
        if intent.left {
            dir -= self.right();
        }
        if intent.right {
            dir += self.right();
        }
        if dir.length_squared() > 0.0 {
            dir.normalize() * speed * dt
        } else {
            Vec3::ZERO
        }
    }

    /// Apply held keys; returns true when the player moved.
    pub fn walk(&mut self, intent: MovementIntent, speed: f32, dt: f32) -> bool {
        let step = self.movement(intent, speed, dt);
        if step == Vec3::ZERO {
            return false;
        }
        self.position += step;
        true
    }

    /// Apply a look delta (pointer movement) scaled by `look_speed`.
    pub fn look(&mut self, dx: f32, dy: f32, look_speed: f32, pitch_limit: f32) {
        self.yaw -= dx * look_speed;
        self.pitch = (self.pitch - dy * look_speed).clamp(-pitch_limit, pitch_limit);
    }

    /// Shift by `offset` without touching orientation.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Move directly to `target`.
    pub fn teleport(&mut self, target: Vec3) {
        self.position = target;
    }
}
