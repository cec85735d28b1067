//! Layered layout of the visible window.
//!
//! Background cards are a pure function of their depth and of the drag
//! signal: as the active card travels away, each card behind it grows into
//! the slot of the card ahead. One extra preload card sits past the window
//! at zero opacity and fades in with the same progress, so nothing pops into
//! existence when the window re-slices.

use std::collections::HashSet;
use std::hash::Hash;

use crate::{
    config::{DeckConfig, MAX_STACK_SIZE},
    content::DeckItem,
    render::{CardLayer, CardTransform},
    signal::{DragReader, advance_progress},
};

pub const MAX_LAYERS: usize = MAX_STACK_SIZE + 1;

pub type Layers<K> = heapless::Vec<CardLayer<K>, MAX_LAYERS>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackStyle {
    pub stack_size: usize,
    pub scale_step: f32,
    pub spacing: f32,
    /// Drag distance at which background cards have fully advanced.
    pub travel: f32,
}

impl From<&DeckConfig> for StackStyle {
    fn from(config: &DeckConfig) -> Self {
        Self {
            stack_size: config.stack_size.clamp(1, MAX_STACK_SIZE),
            scale_step: config.stack_scale_step,
            spacing: config.stack_spacing,
            travel: config.advance_travel(),
        }
    }
}

/// `items[current .. current + stack_size)`, clipped to the list.
pub fn visible_window<T>(items: &[T], current_index: usize, stack_size: usize) -> &[T] {
    let start = current_index.min(items.len());
    let end = current_index.saturating_add(stack_size).min(items.len());
    &items[start..end]
}

/// Scale and vertical offset of a passive card at `depth >= 1`.
pub fn background_pose(depth: usize, progress: f32, style: &StackStyle) -> (f32, f32) {
    let depth = depth as f32;
    let progress = progress.clamp(0.0, 1.0);

    let rest_scale = 1.0 - depth * style.scale_step;
    let advanced_scale = 1.0 - (depth - 1.0) * style.scale_step;
    let rest_y = depth * style.spacing;
    let advanced_y = (depth - 1.0) * style.spacing;

    (
        rest_scale + (advanced_scale - rest_scale) * progress,
        rest_y + (advanced_y - rest_y) * progress,
    )
}

pub fn layer_opacity(depth: usize, progress: f32, stack_size: usize) -> f32 {
    if depth < stack_size {
        1.0
    } else if depth == stack_size {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Clone, Debug)]
pub struct StackCompositor {
    style: StackStyle,
    drag: DragReader,
}

impl StackCompositor {
    pub fn new(config: &DeckConfig, drag: DragReader) -> Self {
        Self {
            style: StackStyle::from(config),
            drag,
        }
    }

    pub fn style(&self) -> &StackStyle {
        &self.style
    }

    pub fn progress(&self) -> f32 {
        advance_progress(self.drag.get(), self.style.travel)
    }

    /// Layers front to back. The active card takes `active`; every other
    /// layer only reads the drag signal.
    pub fn compose<T: DeckItem>(
        &self,
        items: &[T],
        current_index: usize,
        active: CardTransform,
        interactive: bool,
    ) -> Layers<T::Id> {
        let mut layers = Layers::new();
        if current_index >= items.len() {
            return layers;
        }

        let end = current_index
            .saturating_add(self.style.stack_size + 1)
            .min(items.len());
        let count = end - current_index;
        let progress = self.progress();

        for (depth, item) in items[current_index..end].iter().enumerate() {
            let layer = if depth == 0 {
                CardLayer {
                    key: item.id(),
                    item_index: current_index,
                    depth,
                    z_index: count,
                    translate_x: active.x,
                    translate_y: active.y,
                    rotation_deg: active.rotation_deg,
                    scale: 1.0,
                    opacity: 1.0,
                    interactive,
                }
            } else {
                let (scale, translate_y) = background_pose(depth, progress, &self.style);
                CardLayer {
                    key: item.id(),
                    item_index: current_index + depth,
                    depth,
                    z_index: count - depth,
                    translate_x: 0.0,
                    translate_y,
                    rotation_deg: 0.0,
                    scale,
                    opacity: layer_opacity(depth, progress, self.style.stack_size),
                    interactive: false,
                }
            };
            if layers.push(layer).is_err() {
                break;
            }
        }

        layers
    }
}

/// Keys that entered or left the rendered set between two frames.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MountDiff<K> {
    pub mounted: Vec<K>,
    pub unmounted: Vec<K>,
}

/// Tracks which keyed cards a renderer currently has mounted.
#[derive(Clone, Debug)]
pub struct MountTracker<K> {
    live: Vec<K>,
}

impl<K> Default for MountTracker<K> {
    fn default() -> Self {
        Self { live: Vec::new() }
    }
}

impl<K: Clone + Eq + Hash> MountTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe<I>(&mut self, keys: I) -> MountDiff<K>
    where
        I: IntoIterator<Item = K>,
    {
        let next: Vec<K> = keys.into_iter().collect();
        let (mounted, unmounted) = {
            let previous: HashSet<&K> = self.live.iter().collect();
            let current: HashSet<&K> = next.iter().collect();
            let mounted = next
                .iter()
                .filter(|key| !previous.contains(key))
                .cloned()
                .collect();
            let unmounted = self
                .live
                .iter()
                .filter(|key| !current.contains(key))
                .cloned()
                .collect();
            (mounted, unmounted)
        };

        self.live = next;
        MountDiff { mounted, unmounted }
    }

    pub fn live(&self) -> &[K] {
        &self.live
    }
}
