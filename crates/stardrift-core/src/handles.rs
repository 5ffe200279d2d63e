//! Interfaces the core drives on excluded collaborators.
//!
//! The render and collision layers read the components that implement these
//! traits; the core never talks to a renderer or physics engine directly.

use std::sync::Arc;

use glam::DVec2;

use crate::components::{CollisionBody, Sprite};

/// Calls the core makes on a render representation.
pub trait RenderHandle {
    fn set_visible(&mut self, visible: bool);
    fn set_frame(&mut self, frame: Arc<str>);
    fn set_position(&mut self, position: DVec2);
    fn set_rotation(&mut self, rotation: f64);
}

/// Calls the core makes on a collision body.
pub trait CollisionHandle {
    fn set_collision_enabled(&mut self, enabled: bool);
    fn collision_enabled(&self) -> bool;
}

impl RenderHandle for Sprite {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_frame(&mut self, frame: Arc<str>) {
        self.frame = Some(frame);
    }

    fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }
}

impl CollisionHandle for CollisionBody {
    fn set_collision_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn collision_enabled(&self) -> bool {
        self.enabled
    }
}
