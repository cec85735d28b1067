impl<T, IN, L> SwipeDeck<T, IN, L>
where
    T: DeckItem,
    IN: InputProvider,
    L: DeckListener,
{
    fn process_inputs(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_event() {
                Ok(Some(event)) => self.apply_input_event(event, now_ms),
                Ok(None) => break,
                Err(_) => {
                    warn!("deck: input provider failed, cancelling gesture");
                    if let Some(outcome) = self.gesture.interrupt() {
                        self.resolve_gesture(outcome, now_ms);
                    }
                    break;
                }
            }
        }
    }

    fn apply_input_event(&mut self, event: DeckInput, now_ms: u64) {
        if self.is_exhausted() {
            self.gesture.reset();
            return;
        }

        match event {
            DeckInput::PanBegin => {
                if self.motion.is_interactive() {
                    self.gesture.begin();
                }
            }
            DeckInput::PanMove(sample) => {
                let Some(sample) = self.gesture.update(sample) else {
                    return;
                };
                if self.motion.track_to(sample.dx, sample.dy) {
                    self.pending_redraw = true;
                } else {
                    self.gesture.reset();
                }
            }
            DeckInput::PanEnd(sample) => {
                if !self.gesture.is_active() {
                    return;
                }
                let outcome = self.gesture.end(sample);
                self.resolve_gesture(outcome, now_ms);
            }
            DeckInput::PanCancel => {
                if let Some(outcome) = self.gesture.interrupt() {
                    self.resolve_gesture(outcome, now_ms);
                }
            }
            DeckInput::Tap => {
                if !self.gesture.is_active() && self.motion.is_interactive() {
                    self.resolve_gesture(GestureOutcome::Tap, now_ms);
                }
            }
        }
    }

    fn resolve_gesture(&mut self, outcome: GestureOutcome, now_ms: u64) {
        self.pending_redraw = true;

        match outcome {
            GestureOutcome::Commit(direction) => {
                if self.motion.exit(direction, now_ms) {
                    debug!(
                        "deck: card {} leaving {}",
                        self.current_index,
                        direction.as_str()
                    );
                }
            }
            GestureOutcome::SwipeUp => {
                let _ = self.motion.fly_up(now_ms);
            }
            GestureOutcome::Tap => {
                let ticket = self.ticket();
                if !self.mailbox.contains(ticket, Deferred::OpenDetail) {
                    self.post(Deferred::OpenDetail);
                }
            }
            GestureOutcome::Cancel => {
                let _ = self.motion.settle(now_ms);
            }
        }
    }
}
