//! Deck tuning knobs.

use crate::{gesture::GestureThresholds, motion::SpringConfig};

/// Upper bound for simultaneously rendered cards (active + passive).
pub const MAX_STACK_SIZE: usize = 5;
/// Upper bound for undo depth.
pub const MAX_HISTORY: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeckConfig {
    /// Logical screen width in px.
    pub screen_width: f32,
    /// Logical screen height in px.
    pub screen_height: f32,
    /// Cards rendered in the visible window, active card included.
    pub stack_size: usize,
    /// Horizontal distance that commits a swipe.
    pub swipe_threshold: f32,
    /// Horizontal velocity (px/s) that commits a swipe regardless of distance.
    pub swipe_velocity: f32,
    /// Upward distance required for the open-detail swipe.
    pub swipe_up_distance: f32,
    /// Upward velocity (px/s) required for the open-detail swipe.
    pub swipe_up_velocity: f32,
    /// Movement below this is still a tap.
    pub pan_activation: f32,
    pub stack_scale_step: f32,
    pub stack_spacing: f32,
    /// Drag distance, as a fraction of the screen width, at which the
    /// background cards have fully advanced.
    pub advance_travel_ratio: f32,
    pub max_rotation_deg: f32,
    pub exit_duration_ms: u16,
    /// Off-screen target of an exit, as a multiple of the screen width.
    pub exit_distance_ratio: f32,
    pub fly_up_duration_ms: u16,
    /// Fly-up target, as a fraction of the screen height.
    pub fly_up_ratio: f32,
    pub undo_enter_duration_ms: u16,
    /// Re-enter undone cards from the side they left by.
    pub animate_undo: bool,
    pub history_depth: usize,
    pub spring: SpringConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            screen_width: 390.0,
            screen_height: 844.0,
            stack_size: 3,
            swipe_threshold: 120.0,
            swipe_velocity: 800.0,
            swipe_up_distance: 80.0,
            swipe_up_velocity: 500.0,
            pan_activation: 10.0,
            stack_scale_step: 0.04,
            stack_spacing: 16.0,
            advance_travel_ratio: 0.6,
            max_rotation_deg: 8.0,
            exit_duration_ms: 220,
            exit_distance_ratio: 1.3,
            fly_up_duration_ms: 240,
            fly_up_ratio: 0.6,
            undo_enter_duration_ms: 220,
            animate_undo: true,
            history_depth: 8,
            spring: SpringConfig::SNAPPY,
        }
    }
}

impl DeckConfig {
    /// Returns a copy with every field forced into a usable range.
    pub fn sanitized(mut self) -> Self {
        self.screen_width = finite_or(self.screen_width, 390.0).max(1.0);
        self.screen_height = finite_or(self.screen_height, 844.0).max(1.0);
        self.stack_size = self.stack_size.clamp(1, MAX_STACK_SIZE);
        self.history_depth = self.history_depth.clamp(1, MAX_HISTORY);
        self.swipe_threshold = finite_or(self.swipe_threshold, 120.0).max(0.0);
        self.swipe_velocity = finite_or(self.swipe_velocity, 800.0).max(0.0);
        self.swipe_up_distance = finite_or(self.swipe_up_distance, 80.0).max(0.0);
        self.swipe_up_velocity = finite_or(self.swipe_up_velocity, 500.0).max(0.0);
        self.pan_activation = finite_or(self.pan_activation, 10.0).max(0.0);
        self.stack_scale_step = finite_or(self.stack_scale_step, 0.04).clamp(0.0, 0.2);
        self.stack_spacing = finite_or(self.stack_spacing, 16.0).max(0.0);
        self.advance_travel_ratio = finite_or(self.advance_travel_ratio, 0.6).clamp(0.05, 2.0);
        self.max_rotation_deg = finite_or(self.max_rotation_deg, 8.0).clamp(0.0, 45.0);
        self.exit_duration_ms = self.exit_duration_ms.max(1);
        self.exit_distance_ratio = finite_or(self.exit_distance_ratio, 1.3).max(1.0);
        self.fly_up_duration_ms = self.fly_up_duration_ms.max(1);
        self.fly_up_ratio = finite_or(self.fly_up_ratio, 0.6).clamp(0.1, 2.0);
        self.undo_enter_duration_ms = self.undo_enter_duration_ms.max(1);
        self.spring = self.spring.sanitized();
        self
    }

    pub fn thresholds(&self) -> GestureThresholds {
        GestureThresholds {
            commit_distance: self.swipe_threshold,
            commit_velocity: self.swipe_velocity,
            swipe_up_distance: self.swipe_up_distance,
            swipe_up_velocity: self.swipe_up_velocity,
            activation: self.pan_activation,
        }
    }

    pub fn exit_distance(&self) -> f32 {
        self.screen_width * self.exit_distance_ratio
    }

    pub fn fly_up_distance(&self) -> f32 {
        self.screen_height * self.fly_up_ratio
    }

    pub fn advance_travel(&self) -> f32 {
        self.screen_width * self.advance_travel_ratio
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_stack_and_history() {
        let config = DeckConfig {
            stack_size: 0,
            history_depth: 10_000,
            screen_width: f32::NAN,
            ..DeckConfig::default()
        }
        .sanitized();

        assert_eq!(config.stack_size, 1);
        assert_eq!(config.history_depth, MAX_HISTORY);
        assert_eq!(config.screen_width, 390.0);
    }

    #[test]
    fn derived_distances_follow_screen_size() {
        let config = DeckConfig::default();
        assert!(config.exit_distance() > config.screen_width);
        assert!(config.advance_travel() < config.screen_width);
        assert!(config.fly_up_distance() < config.screen_height);
    }
}
