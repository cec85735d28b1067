impl<T, IN, L> SwipeDeck<T, IN, L>
where
    T: DeckItem,
    IN: InputProvider,
    L: DeckListener,
{
    /// Replaces the item list. A list whose ids differ from the current one
    /// in any position (or in length) restarts the deck at index 0 with an
    /// empty history; anything in flight for the old list is discarded.
    /// Same ids in the same order only swap content.
    pub fn set_items(&mut self, items: Vec<T>) {
        let changed = !same_identity(&self.items, &items);
        self.items = items;
        self.pending_redraw = true;

        if !changed {
            trace!("deck: item content refreshed, identity unchanged");
            self.current_index = self.current_index.min(self.items.len());
            return;
        }

        self.history.clear();
        self.mailbox.clear();
        self.current_index = 0;
        self.mount_active_card();
        self.exhausted_reported = self.items.is_empty();
        debug!("deck: new item list ({} items), index reset", self.items.len());
        self.listener.on_index_change(0);
    }

    /// Restores the most recently committed card. Returns `false` when the
    /// history is empty, or while a finger is on the card or the card is
    /// still moving. Use [`SwipeDeck::request`] to have it applied once the
    /// deck settles.
    pub fn undo(&mut self, now_ms: u64) -> bool {
        if !self.ready_for_undo() {
            debug!("deck: undo refused, card {} is busy", self.current_index);
            return false;
        }
        self.apply_undo(now_ms)
    }

    fn ready_for_undo(&self) -> bool {
        !self.gesture.is_active()
            && self.mailbox.is_empty()
            && (self.is_exhausted() || self.motion.accepts_commands())
    }

    fn ticket(&self) -> CardTicket {
        CardTicket {
            generation: self.generation,
            index: self.current_index,
        }
    }

    fn post(&mut self, event: Deferred) {
        let ticket = self.ticket();
        if let Some(dropped) = self.mailbox.post(ticket, event, self.frame) {
            warn!("deck: mailbox full, dropped {:?}", dropped.event);
        }
    }

    fn mount_active_card(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.gesture.reset();
        self.motion.remount();
    }

    fn step_motion(&mut self, now_ms: u64) {
        let Some(done) = self.motion.step(now_ms) else {
            return;
        };
        self.pending_redraw = true;

        match done {
            MotionCompletion::Exited(direction) => self.post(Deferred::Commit(direction)),
            MotionCompletion::FlewUp => self.post(Deferred::OpenDetail),
            MotionCompletion::Settled | MotionCompletion::Entered => {
                trace!("deck: card {} {:?}", self.current_index, done);
            }
        }
    }

    fn drain_mailbox(&mut self) {
        while let Some(posted) = self.mailbox.pop_ready(self.frame) {
            let current = self.ticket();
            if posted.ticket != current {
                debug!(
                    "deck: dropping stale {:?} for card {} (generation {}, now {})",
                    posted.event, posted.ticket.index, posted.ticket.generation, current.generation
                );
                continue;
            }

            match posted.event {
                Deferred::Commit(direction) => self.apply_commit(direction),
                Deferred::OpenDetail => self.apply_open_detail(),
            }
        }
    }

    fn apply_commit(&mut self, direction: SwipeDirection) {
        let index = self.current_index;
        if index >= self.items.len() {
            return;
        }

        if self.history.len() >= self.config.history_depth {
            let _ = self.history.pop_front();
        }
        let _ = self.history.push_back(HistoryEntry { index, direction });

        // Index first, then the drag reset, so the re-sliced window never
        // renders with the previous card's offset.
        self.current_index = index + 1;
        self.mount_active_card();
        self.pending_redraw = true;
        debug!(
            "deck: committed card {} {}, index -> {}",
            index,
            direction.as_str(),
            self.current_index
        );

        match direction {
            SwipeDirection::Left => self.listener.on_swiped_left(index),
            SwipeDirection::Right => self.listener.on_swiped_right(index),
        }
        self.listener.on_index_change(self.current_index);

        if self.is_exhausted() && !self.exhausted_reported {
            self.exhausted_reported = true;
            debug!("deck: exhausted after {} items", self.items.len());
            self.listener.on_exhausted();
        }
    }

    fn apply_open_detail(&mut self) {
        let index = self.current_index;
        if index >= self.items.len() {
            return;
        }
        if self.motion.phase() == MotionPhase::Gone {
            self.motion.remount();
        }
        self.pending_redraw = true;
        debug!("deck: open detail for card {}", index);
        self.listener.on_swipe_up(index);
    }

    fn apply_undo(&mut self, now_ms: u64) -> bool {
        let Some(entry) = self.history.pop_back() else {
            trace!("deck: undo with empty history");
            return false;
        };

        let index = entry.index.min(self.items.len());
        self.current_index = index;
        self.mount_active_card();
        self.exhausted_reported = false;
        self.pending_redraw = true;

        if self.config.animate_undo && index < self.items.len() {
            self.motion.enter_from(entry.direction, now_ms);
        }
        debug!("deck: undo, index -> {}", index);
        self.listener.on_index_change(index);
        true
    }

    fn swipe_active(&mut self, direction: SwipeDirection, now_ms: u64) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.gesture.reset();
        let started = self.motion.exit(direction, now_ms);
        if started {
            self.pending_redraw = true;
            debug!(
                "deck: card {} sent {}",
                self.current_index,
                direction.as_str()
            );
        }
        started
    }

    /// Consumes at most one pending request. A request waits while a finger
    /// is on the card or a non-exit animation is running. A swipe request
    /// that arrives while the card is already exiting is acknowledged and
    /// dropped, since that card is already being committed.
    fn consume_request(&mut self, now_ms: u64) {
        let Some(kind) = self.requests.next() else {
            return;
        };
        if self.gesture.is_active() || !self.mailbox.is_empty() {
            return;
        }

        let exiting = matches!(
            self.motion.phase(),
            MotionPhase::Animating(AnimationKind::Exit(_))
        );
        let settled = self.is_exhausted() || self.motion.accepts_commands();

        match kind {
            RequestKind::SwipeLeft | RequestKind::SwipeRight => {
                let direction = if kind == RequestKind::SwipeLeft {
                    SwipeDirection::Left
                } else {
                    SwipeDirection::Right
                };
                if exiting {
                    debug!("deck: {} ignored, card already leaving", kind.as_str());
                } else if !settled {
                    return;
                } else if !self.swipe_active(direction, now_ms) {
                    debug!("deck: {} ignored, nothing to swipe", kind.as_str());
                }
            }
            RequestKind::Undo => {
                if !self.ready_for_undo() {
                    return;
                }
                let _ = self.apply_undo(now_ms);
            }
        }

        self.requests.take(kind);
        self.listener.on_request_consumed(kind);
    }
}

impl<T, IN, L> CardCommands for SwipeDeck<T, IN, L>
where
    T: DeckItem,
    IN: InputProvider,
    L: DeckListener,
{
    fn swipe(&mut self, direction: SwipeDirection, now_ms: u64) -> bool {
        self.swipe_active(direction, now_ms)
    }

    fn reset_active_card(&mut self) {
        if self.is_exhausted() {
            return;
        }
        self.mount_active_card();
        self.pending_redraw = true;
    }
}
