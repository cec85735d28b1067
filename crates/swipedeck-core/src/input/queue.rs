use std::collections::VecDeque;

use super::{DeckInput, InputProvider};
use crate::gesture::PanSample;

/// FIFO the host pushes platform events into between ticks.
#[derive(Default, Debug, Clone)]
pub struct QueuedInput {
    events: VecDeque<DeckInput>,
}

impl QueuedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DeckInput) {
        self.events.push_back(event);
    }

    /// Queues a complete drag: begin, `steps` evenly spaced moves, release.
    pub fn push_drag(&mut self, release: PanSample, steps: u16) {
        self.push(DeckInput::PanBegin);
        let steps = steps.max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            self.push(DeckInput::PanMove(PanSample::new(
                release.dx * t,
                release.dy * t,
                release.vx,
                release.vy,
            )));
        }
        self.push(DeckInput::PanEnd(release));
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl InputProvider for QueuedInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<DeckInput>, Self::Error> {
        Ok(self.events.pop_front())
    }
}
