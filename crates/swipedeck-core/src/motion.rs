//! Animated position of the active card.
//!
//! The engine owns `(x, y)` for one card at a time and publishes `x` to the
//! drag signal on every change. Gesture tracking writes positions directly;
//! settle runs a damped spring back to the origin; exit, fly-up and undo
//! re-entry run eased tweens. Each resolution yields exactly one
//! [`MotionCompletion`] from [`CardMotion::step`], after which the phase has
//! already moved on, so a completion can never be observed twice.

use log::trace;

use crate::{
    config::DeckConfig,
    gesture::SwipeDirection,
    render::{AnimationFrame, AnimationKind, AnimationSpec, CardTransform, Easing},
    signal::{DragReader, DragWriter},
};

const SPRING_STEP_MS: u64 = 4;
const SPRING_MAX_GAP_MS: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub mass: f32,
    pub damping: f32,
    pub stiffness: f32,
    /// Stop at the origin instead of swinging through it.
    pub overshoot_clamping: bool,
    /// Below this displacement (px) and `rest_speed` the spring snaps to rest.
    pub rest_displacement: f32,
    pub rest_speed: f32,
}

impl SpringConfig {
    /// Quick return used after a cancelled drag.
    pub const SNAPPY: Self = Self {
        mass: 0.6,
        damping: 14.0,
        stiffness: 100.0,
        overshoot_clamping: true,
        rest_displacement: 0.5,
        rest_speed: 2.0,
    };

    pub fn sanitized(mut self) -> Self {
        let fallback = Self::SNAPPY;
        if !(self.mass.is_finite() && self.mass > 0.0) {
            self.mass = fallback.mass;
        }
        if !(self.damping.is_finite() && self.damping > 0.0) {
            self.damping = fallback.damping;
        }
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            self.stiffness = fallback.stiffness;
        }
        if !(self.rest_displacement.is_finite() && self.rest_displacement > 0.0) {
            self.rest_displacement = fallback.rest_displacement;
        }
        if !(self.rest_speed.is_finite() && self.rest_speed > 0.0) {
            self.rest_speed = fallback.rest_speed;
        }
        self
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::SNAPPY
    }
}

/// Emitted once per resolution by [`CardMotion::step`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotionCompletion {
    Settled,
    Exited(SwipeDirection),
    FlewUp,
    Entered,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MotionPhase {
    Rest,
    Tracking,
    Settling,
    Animating(AnimationKind),
    /// Off screen after an exit or fly-up, waiting to be remounted.
    Gone,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Rest,
    Tracking,
    Settling {
        last_ms: u64,
    },
    Tween {
        spec: AnimationSpec,
        from: (f32, f32),
        to: (f32, f32),
    },
    Gone,
}

/// Imperative control over the active card, usable without gesture input.
pub trait CardCommands {
    /// Starts an exit toward `direction`. Returns `false` when the card is
    /// already resolving and the command was ignored.
    fn swipe(&mut self, direction: SwipeDirection, now_ms: u64) -> bool;

    /// Puts the card back at rest immediately, abandoning any animation.
    fn reset_active_card(&mut self);
}

#[derive(Debug)]
pub struct CardMotion {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    phase: Phase,
    drag: DragWriter,
    spring: SpringConfig,
    screen_width: f32,
    max_rotation_deg: f32,
    exit_distance: f32,
    exit_duration_ms: u16,
    fly_up_distance: f32,
    fly_up_duration_ms: u16,
    enter_duration_ms: u16,
}

impl CardMotion {
    pub fn new(config: &DeckConfig, drag: DragWriter) -> Self {
        drag.reset();
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            phase: Phase::Rest,
            drag,
            spring: config.spring,
            screen_width: config.screen_width,
            max_rotation_deg: config.max_rotation_deg,
            exit_distance: config.exit_distance(),
            exit_duration_ms: config.exit_duration_ms,
            fly_up_distance: config.fly_up_distance(),
            fly_up_duration_ms: config.fly_up_duration_ms,
            enter_duration_ms: config.undo_enter_duration_ms,
        }
    }

    pub fn drag_reader(&self) -> DragReader {
        self.drag.reader()
    }

    pub fn phase(&self) -> MotionPhase {
        match self.phase {
            Phase::Rest => MotionPhase::Rest,
            Phase::Tracking => MotionPhase::Tracking,
            Phase::Settling { .. } => MotionPhase::Settling,
            Phase::Tween { spec, .. } => MotionPhase::Animating(spec.kind),
            Phase::Gone => MotionPhase::Gone,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Linear in `x` over `[-screen_width, screen_width]`, clamped beyond.
    pub fn rotation_deg(&self) -> f32 {
        let t = (self.x / self.screen_width).clamp(-1.0, 1.0);
        t * self.max_rotation_deg
    }

    pub fn transform(&self) -> CardTransform {
        CardTransform {
            x: self.x,
            y: self.y,
            rotation_deg: self.rotation_deg(),
        }
    }

    /// The card still accepts gestures.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self.phase,
            Phase::Rest | Phase::Tracking | Phase::Settling { .. }
        )
    }

    /// The card can take a programmatic command without fighting a finger.
    pub fn accepts_commands(&self) -> bool {
        matches!(self.phase, Phase::Rest | Phase::Settling { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. } | Phase::Tween { .. })
    }

    pub fn animation_frame(&self, now_ms: u64) -> Option<AnimationFrame> {
        match self.phase {
            Phase::Tween { spec, .. } => spec.frame(now_ms),
            _ => None,
        }
    }

    /// Unanimated 1:1 position set during a pan. Takes over from an
    /// in-flight settle. Ignored once the card is exiting or gone.
    pub fn track_to(&mut self, x: f32, y: f32) -> bool {
        if !self.is_interactive() {
            return false;
        }
        self.phase = Phase::Tracking;
        self.vx = 0.0;
        self.vy = 0.0;
        self.set_position(x, y);
        true
    }

    /// Springs back to the origin.
    pub fn settle(&mut self, now_ms: u64) -> bool {
        if !self.is_interactive() {
            return false;
        }
        self.phase = Phase::Settling { last_ms: now_ms };
        true
    }

    pub fn exit(&mut self, direction: SwipeDirection, now_ms: u64) -> bool {
        if !self.is_interactive() {
            return false;
        }
        let to = (direction.sign() * self.exit_distance, self.y * 0.25);
        self.start_tween(
            AnimationSpec::new(
                AnimationKind::Exit(direction),
                now_ms,
                self.exit_duration_ms,
                Easing::OutQuad,
            ),
            to,
        );
        true
    }

    pub fn fly_up(&mut self, now_ms: u64) -> bool {
        if !self.is_interactive() {
            return false;
        }
        self.start_tween(
            AnimationSpec::new(
                AnimationKind::FlyUp,
                now_ms,
                self.fly_up_duration_ms,
                Easing::OutCubic,
            ),
            (0.0, -self.fly_up_distance),
        );
        true
    }

    /// Places the card off screen on the `direction` side and eases it back
    /// to rest. Used when an undo restores a card.
    pub fn enter_from(&mut self, direction: SwipeDirection, now_ms: u64) {
        self.vx = 0.0;
        self.vy = 0.0;
        self.set_position(direction.sign() * self.exit_distance, 0.0);
        self.start_tween(
            AnimationSpec::new(
                AnimationKind::Enter(direction),
                now_ms,
                self.enter_duration_ms,
                Easing::OutCubic,
            ),
            (0.0, 0.0),
        );
    }

    /// Puts a freshly mounted card at rest and zeroes the drag signal.
    pub fn remount(&mut self) {
        self.phase = Phase::Rest;
        self.vx = 0.0;
        self.vy = 0.0;
        self.set_position(0.0, 0.0);
    }

    /// Advances the running animation to `now_ms`.
    pub fn step(&mut self, now_ms: u64) -> Option<MotionCompletion> {
        match self.phase {
            Phase::Rest | Phase::Tracking | Phase::Gone => None,
            Phase::Settling { last_ms } => self.step_spring(last_ms, now_ms),
            Phase::Tween { spec, from, to } => self.step_tween(spec, from, to, now_ms),
        }
    }

    fn start_tween(&mut self, spec: AnimationSpec, to: (f32, f32)) {
        self.vx = 0.0;
        self.vy = 0.0;
        self.phase = Phase::Tween {
            spec,
            from: (self.x, self.y),
            to,
        };
    }

    fn step_spring(&mut self, last_ms: u64, now_ms: u64) -> Option<MotionCompletion> {
        let gap_ms = now_ms.saturating_sub(last_ms).min(SPRING_MAX_GAP_MS);
        if gap_ms > 0 {
            let steps = gap_ms.div_ceil(SPRING_STEP_MS);
            let dt = gap_ms as f32 / 1_000.0 / steps as f32;
            let (mut x, mut y) = (self.x, self.y);
            for _ in 0..steps {
                spring_step(&mut x, &mut self.vx, &self.spring, dt);
                spring_step(&mut y, &mut self.vy, &self.spring, dt);
            }
            self.set_position(x, y);
        }

        let spring = &self.spring;
        let at_rest = self.x.abs() < spring.rest_displacement
            && self.y.abs() < spring.rest_displacement
            && self.vx.abs() < spring.rest_speed
            && self.vy.abs() < spring.rest_speed;
        if at_rest {
            self.remount();
            trace!("motion: settled");
            return Some(MotionCompletion::Settled);
        }

        self.phase = Phase::Settling {
            last_ms: last_ms.max(now_ms),
        };
        None
    }

    fn step_tween(
        &mut self,
        spec: AnimationSpec,
        from: (f32, f32),
        to: (f32, f32),
        now_ms: u64,
    ) -> Option<MotionCompletion> {
        if let Some(t) = spec.progress(now_ms) {
            self.set_position(lerp(from.0, to.0, t), lerp(from.1, to.1, t));
            return None;
        }

        self.set_position(to.0, to.1);
        let completion = match spec.kind {
            AnimationKind::Exit(direction) => {
                self.phase = Phase::Gone;
                MotionCompletion::Exited(direction)
            }
            AnimationKind::FlyUp => {
                self.phase = Phase::Gone;
                MotionCompletion::FlewUp
            }
            AnimationKind::Enter(_) => {
                self.remount();
                MotionCompletion::Entered
            }
        };
        trace!("motion: {:?} finished", spec.kind);
        Some(completion)
    }

    fn set_position(&mut self, x: f32, y: f32) {
        self.x = if x.is_finite() { x } else { 0.0 };
        self.y = if y.is_finite() { y } else { 0.0 };
        self.drag.set(self.x);
    }
}

impl CardCommands for CardMotion {
    fn swipe(&mut self, direction: SwipeDirection, now_ms: u64) -> bool {
        self.exit(direction, now_ms)
    }

    fn reset_active_card(&mut self) {
        self.remount();
    }
}

fn spring_step(pos: &mut f32, vel: &mut f32, spring: &SpringConfig, dt: f32) {
    let before = *pos;
    let accel = (-spring.stiffness * before - spring.damping * *vel) / spring.mass;
    *vel += accel * dt;
    *pos += *vel * dt;

    if spring.overshoot_clamping && before != 0.0 && (before > 0.0) != (*pos > 0.0) {
        *pos = 0.0;
        *vel = 0.0;
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::drag_signal;

    const FRAME_MS: u64 = 16;

    fn motion() -> (CardMotion, DragReader) {
        let (writer, reader) = drag_signal();
        (CardMotion::new(&DeckConfig::default(), writer), reader)
    }

    fn run_until_done(
        motion: &mut CardMotion,
        mut now: u64,
        limit_ms: u64,
    ) -> (u64, Vec<MotionCompletion>) {
        let end = now + limit_ms;
        let mut completions = Vec::new();
        while now <= end {
            now += FRAME_MS;
            if let Some(done) = motion.step(now) {
                completions.push(done);
            }
        }
        (now, completions)
    }

    #[test]
    fn settle_returns_exactly_to_rest_once() {
        let (mut motion, reader) = motion();
        assert!(motion.track_to(100.0, 30.0));
        assert_eq!(reader.get(), 100.0);

        assert!(motion.settle(0));
        let (_, completions) = run_until_done(&mut motion, 0, 2_000);

        assert_eq!(completions, vec![MotionCompletion::Settled]);
        assert_eq!(motion.position(), (0.0, 0.0));
        assert_eq!(motion.phase(), MotionPhase::Rest);
        assert!(reader.is_at_rest());
    }

    #[test]
    fn clamped_spring_never_crosses_origin() {
        let (mut motion, reader) = motion();
        motion.track_to(-150.0, 0.0);
        motion.settle(0);

        let mut now = 0;
        for _ in 0..120 {
            now += FRAME_MS;
            let _ = motion.step(now);
            assert!(reader.get() <= 0.0);
        }
    }

    #[test]
    fn settle_from_rest_completes_on_next_step() {
        let (mut motion, _) = motion();
        motion.settle(5);
        assert_eq!(motion.step(5), Some(MotionCompletion::Settled));
        assert_eq!(motion.step(21), None);
    }

    #[test]
    fn exit_reaches_off_screen_and_fires_once() {
        let (mut motion, reader) = motion();
        let config = DeckConfig::default();
        motion.track_to(150.0, 40.0);
        assert!(motion.exit(SwipeDirection::Right, 0));
        assert!(!motion.exit(SwipeDirection::Left, 10));
        assert!(!motion.track_to(0.0, 0.0));

        let (_, completions) = run_until_done(&mut motion, 0, 1_000);
        assert_eq!(
            completions,
            vec![MotionCompletion::Exited(SwipeDirection::Right)]
        );
        assert_eq!(motion.phase(), MotionPhase::Gone);
        assert_eq!(motion.position(), (config.exit_distance(), 10.0));
        // The signal holds the off-screen value until the next card is mounted.
        assert_eq!(reader.get(), config.exit_distance());

        motion.remount();
        assert!(reader.is_at_rest());
        assert!(motion.is_interactive());
    }

    #[test]
    fn exit_interrupts_a_settle() {
        let (mut motion, _) = motion();
        motion.track_to(60.0, 0.0);
        motion.settle(0);
        let _ = motion.step(16);
        assert!(motion.exit(SwipeDirection::Left, 16));
        assert_eq!(
            motion.phase(),
            MotionPhase::Animating(AnimationKind::Exit(SwipeDirection::Left))
        );
    }

    #[test]
    fn fly_up_recentres_x() {
        let (mut motion, reader) = motion();
        let config = DeckConfig::default();
        motion.track_to(20.0, -100.0);
        assert!(motion.fly_up(0));

        let (_, completions) = run_until_done(&mut motion, 0, 1_000);
        assert_eq!(completions, vec![MotionCompletion::FlewUp]);
        assert_eq!(motion.position(), (0.0, -config.fly_up_distance()));
        assert!(reader.is_at_rest());
    }

    #[test]
    fn enter_comes_back_from_exit_side() {
        let (mut motion, reader) = motion();
        motion.enter_from(SwipeDirection::Left, 0);
        assert!(reader.get() < 0.0);
        assert!(!motion.is_interactive());

        let (_, completions) = run_until_done(&mut motion, 0, 1_000);
        assert_eq!(completions, vec![MotionCompletion::Entered]);
        assert_eq!(motion.phase(), MotionPhase::Rest);
        assert!(reader.is_at_rest());
    }

    #[test]
    fn rotation_is_clamped_to_range() {
        let (mut motion, _) = motion();
        let config = DeckConfig::default();

        motion.track_to(config.screen_width / 2.0, 0.0);
        assert_eq!(motion.rotation_deg(), config.max_rotation_deg / 2.0);

        motion.track_to(-config.screen_width * 3.0, 0.0);
        assert_eq!(motion.rotation_deg(), -config.max_rotation_deg);
    }

    #[test]
    fn reset_command_abandons_exit() {
        let (mut motion, reader) = motion();
        motion.track_to(200.0, 0.0);
        assert!(CardCommands::swipe(&mut motion, SwipeDirection::Right, 0));
        motion.reset_active_card();

        assert_eq!(motion.phase(), MotionPhase::Rest);
        assert!(reader.is_at_rest());
        let (_, completions) = run_until_done(&mut motion, 0, 500);
        assert!(completions.is_empty());
    }
}
