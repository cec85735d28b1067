//! View models and animation timing handed to the renderer.

use crate::gesture::SwipeDirection;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Easing {
    Linear,
    OutQuad,
    OutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnimationKind {
    Exit(SwipeDirection),
    FlyUp,
    /// Undone card coming back from the side it left by.
    Enter(SwipeDirection),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnimationFrame {
    pub kind: AnimationKind,
    /// 0..=100
    pub progress_pct: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    pub start_ms: u64,
    pub duration_ms: u16,
    pub easing: Easing,
}

impl AnimationSpec {
    pub const fn new(kind: AnimationKind, start_ms: u64, duration_ms: u16, easing: Easing) -> Self {
        Self {
            kind,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Eased progress in `0..1`, or `None` once the animation has finished.
    pub fn progress(self, now_ms: u64) -> Option<f32> {
        let duration = self.duration_ms.max(1) as u64;
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= duration {
            return None;
        }

        Some(self.easing.apply(elapsed as f32 / duration as f32))
    }

    pub fn frame(self, now_ms: u64) -> Option<AnimationFrame> {
        let duration = self.duration_ms.max(1) as u64;
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= duration {
            return None;
        }

        let progress = ((elapsed * 100) / duration).min(100) as u8;
        Some(AnimationFrame {
            kind: self.kind,
            progress_pct: progress,
        })
    }
}

/// Position and rotation of the active card.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CardTransform {
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
}

impl CardTransform {
    pub const REST: Self = Self {
        x: 0.0,
        y: 0.0,
        rotation_deg: 0.0,
    };
}

/// One rendered card. Renderers must key their nodes by `key`, never by
/// `depth` or position in the layer list.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayer<K> {
    pub key: K,
    pub item_index: usize,
    /// 0 is the active card.
    pub depth: usize,
    /// Larger is drawn on top.
    pub z_index: usize,
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation_deg: f32,
    pub scale: f32,
    pub opacity: f32,
    pub interactive: bool,
}

/// App-level view model consumed by the renderer.
#[derive(Debug)]
pub enum DeckScreen<'a, K> {
    /// No items were supplied.
    Empty,
    Exhausted {
        total: usize,
        can_undo: bool,
    },
    Stack {
        /// Front to back.
        layers: &'a [CardLayer<K>],
        current_index: usize,
        total: usize,
        can_undo: bool,
        animation: Option<AnimationFrame>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_curves_hit_endpoints() {
        for easing in [Easing::Linear, Easing::OutQuad, Easing::OutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!(Easing::OutQuad.apply(0.5) > 0.5);
    }

    #[test]
    fn spec_reports_progress_then_finishes() {
        let spec = AnimationSpec::new(AnimationKind::FlyUp, 1_000, 200, Easing::Linear);
        assert_eq!(spec.progress(1_000), Some(0.0));
        assert_eq!(spec.progress(1_100), Some(0.5));
        assert_eq!(spec.progress(1_200), None);
        assert_eq!(
            spec.frame(1_050),
            Some(AnimationFrame {
                kind: AnimationKind::FlyUp,
                progress_pct: 25,
            })
        );
    }
}
