impl<T, IN, L> SwipeDeck<T, IN, L>
where
    T: DeckItem,
    IN: InputProvider,
    L: DeckListener,
{
    pub fn new(items: Vec<T>, input: IN, listener: L, config: DeckConfig) -> Self {
        let config = config.sanitized();
        let (writer, reader) = drag_signal();
        let exhausted_reported = items.is_empty();

        Self {
            items,
            input,
            listener,
            config,
            current_index: 0,
            history: Deque::new(),
            generation: 0,
            frame: 0,
            gesture: GestureTracker::new(config.thresholds()),
            motion: CardMotion::new(&config, writer),
            compositor: StackCompositor::new(&config, reader),
            mailbox: Mailbox::new(),
            requests: RequestLatch::new(),
            pending_redraw: true,
            exhausted_reported,
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.frame = self.frame.wrapping_add(1);

        self.drain_mailbox();
        self.consume_request(now_ms);

        self.process_inputs(now_ms);
        self.step_motion(now_ms);

        let busy =
            self.motion.is_animating() || self.gesture.is_panning() || !self.mailbox.is_empty();
        if self.pending_redraw || busy {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }

    pub fn with_screen<F>(&self, now_ms: u64, f: F)
    where
        F: FnOnce(DeckScreen<'_, T::Id>),
    {
        let total = self.items.len();
        let can_undo = self.can_undo();

        if total == 0 {
            f(DeckScreen::Empty);
            return;
        }
        if self.is_exhausted() {
            f(DeckScreen::Exhausted { total, can_undo });
            return;
        }

        let layers = self.compositor.compose(
            &self.items,
            self.current_index,
            self.motion.transform(),
            self.motion.is_interactive(),
        );
        f(DeckScreen::Stack {
            layers: &layers,
            current_index: self.current_index,
            total,
            can_undo,
            animation: self.motion.animation_frame(now_ms),
        });
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn state(&self) -> DeckState {
        if self.is_exhausted() {
            DeckState::Exhausted
        } else {
            DeckState::Active(self.current_index)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.items.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// `items[current_index .. current_index + stack_size)`.
    pub fn visible_items(&self) -> &[T] {
        visible_window(&self.items, self.current_index, self.config.stack_size)
    }

    pub fn active_item(&self) -> Option<&T> {
        self.items.get(self.current_index)
    }

    pub fn drag_reader(&self) -> DragReader {
        self.motion.drag_reader()
    }

    pub fn drag_offset(&self) -> f32 {
        self.motion.drag_reader().get()
    }

    pub fn active_transform(&self) -> CardTransform {
        self.motion.transform()
    }

    pub fn motion_phase(&self) -> MotionPhase {
        self.motion.phase()
    }

    /// No gesture, animation or deferred transition is in flight.
    pub fn is_idle(&self) -> bool {
        !self.gesture.is_active()
            && self.mailbox.is_empty()
            && matches!(self.motion.phase(), MotionPhase::Rest)
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    pub fn requests(&self) -> &RequestLatch {
        &self.requests
    }

    /// Raises a one-shot request, consumed on a later tick. Fails while a
    /// request of the same kind has not been acknowledged yet.
    pub fn request(&mut self, kind: RequestKind) -> Result<(), RequestError> {
        self.requests.request(kind)
    }
}
