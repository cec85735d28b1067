//! Pan tracking and release classification for the active card.

use heapless::Deque;
use log::debug;

const VELOCITY_WINDOW_MS: u64 = 100;
const VELOCITY_POINTS: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Only positive values map to `Right`; zero counts as `Left`.
    pub fn from_sign(value: f32) -> Self {
        if value > 0.0 { Self::Right } else { Self::Left }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Decision reached when a gesture ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GestureOutcome {
    Commit(SwipeDirection),
    /// Fast upward fling: open the detail view.
    SwipeUp,
    /// Released before the pan activated. Opens the detail view like `SwipeUp`.
    Tap,
    Cancel,
}

/// Cumulative displacement since gesture start plus instantaneous velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanSample {
    pub dx: f32,
    pub dy: f32,
    /// px/s
    pub vx: f32,
    /// px/s, negative is upward.
    pub vy: f32,
}

impl PanSample {
    pub const fn new(dx: f32, dy: f32, vx: f32, vy: f32) -> Self {
        Self { dx, dy, vx, vy }
    }

    pub const fn at(dx: f32, dy: f32) -> Self {
        Self::new(dx, dy, 0.0, 0.0)
    }

    fn sanitized(self) -> Self {
        Self {
            dx: finite_or_zero(self.dx),
            dy: finite_or_zero(self.dy),
            vx: finite_or_zero(self.vx),
            vy: finite_or_zero(self.vy),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureThresholds {
    pub commit_distance: f32,
    pub commit_velocity: f32,
    pub swipe_up_distance: f32,
    pub swipe_up_velocity: f32,
    pub activation: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        crate::DeckConfig::default().thresholds()
    }
}

/// Classifies a released, activated pan.
///
/// The upward check runs first and short-circuits, so a predominantly
/// vertical fling never commits left or right.
pub fn classify(sample: PanSample, thresholds: &GestureThresholds) -> GestureOutcome {
    let sample = sample.sanitized();

    let vertical = sample.dy.abs() > sample.dx.abs();
    if vertical
        && sample.dy < -thresholds.swipe_up_distance
        && sample.vy < -thresholds.swipe_up_velocity
    {
        return GestureOutcome::SwipeUp;
    }

    let far_enough = sample.dx.abs() > thresholds.commit_distance;
    let fast_enough = sample.vx.abs() > thresholds.commit_velocity;
    if far_enough || fast_enough {
        // Direction follows where the card is, not where it was flung.
        return GestureOutcome::Commit(SwipeDirection::from_sign(sample.dx));
    }

    GestureOutcome::Cancel
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TrackerPhase {
    Idle,
    /// Pointer down, still below the activation distance.
    Pending,
    Panning,
}

/// Follows one pointer stream for the active card.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    thresholds: GestureThresholds,
    phase: TrackerPhase,
}

impl GestureTracker {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            phase: TrackerPhase::Idle,
        }
    }

    pub fn begin(&mut self) {
        self.phase = TrackerPhase::Pending;
    }

    /// Feeds one move event. Returns the displacement to apply 1:1 to the
    /// card once the pan has activated.
    pub fn update(&mut self, sample: PanSample) -> Option<PanSample> {
        let sample = sample.sanitized();

        match self.phase {
            TrackerPhase::Idle => None,
            TrackerPhase::Pending => {
                let activation = self.thresholds.activation;
                if sample.dx.abs() > activation || sample.dy.abs() > activation {
                    self.phase = TrackerPhase::Panning;
                    Some(sample)
                } else {
                    None
                }
            }
            TrackerPhase::Panning => Some(sample),
        }
    }

    /// Resolves the gesture. A stream that never began resolves to cancel.
    pub fn end(&mut self, sample: PanSample) -> GestureOutcome {
        let phase = self.phase;
        self.phase = TrackerPhase::Idle;

        let outcome = match phase {
            TrackerPhase::Idle => GestureOutcome::Cancel,
            TrackerPhase::Pending => {
                let sample = sample.sanitized();
                let activation = self.thresholds.activation;
                if sample.dx.abs() > activation || sample.dy.abs() > activation {
                    classify(sample, &self.thresholds)
                } else {
                    GestureOutcome::Tap
                }
            }
            TrackerPhase::Panning => classify(sample, &self.thresholds),
        };
        debug!(
            "gesture: end dx={} dy={} vx={} vy={} -> {:?}",
            sample.dx, sample.dy, sample.vx, sample.vy, outcome
        );
        outcome
    }

    /// Stream interrupted by the system. Any gesture in flight becomes a cancel.
    pub fn interrupt(&mut self) -> Option<GestureOutcome> {
        if self.phase == TrackerPhase::Idle {
            return None;
        }
        self.phase = TrackerPhase::Idle;
        Some(GestureOutcome::Cancel)
    }

    /// Drops the gesture without producing an outcome.
    pub fn reset(&mut self) {
        self.phase = TrackerPhase::Idle;
    }

    pub fn is_active(&self) -> bool {
        self.phase != TrackerPhase::Idle
    }

    pub fn is_panning(&self) -> bool {
        self.phase == TrackerPhase::Panning
    }
}

/// Turns raw pointer positions into [`PanSample`]s, estimating velocity
/// over the last 100 ms of movement.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    origin: Option<(f32, f32)>,
    points: Deque<(u64, f32, f32), VELOCITY_POINTS>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.origin = None;
        self.points.clear();
    }

    /// Records an absolute position. The first point of a stream is the
    /// origin for the cumulative displacement.
    pub fn record(&mut self, t_ms: u64, x: f32, y: f32) -> PanSample {
        let (ox, oy) = *self.origin.get_or_insert((x, y));
        if self.points.is_full() {
            let _ = self.points.pop_front();
        }
        let _ = self.points.push_back((t_ms, x, y));

        let (vx, vy) = self.velocity();
        PanSample::new(x - ox, y - oy, vx, vy).sanitized()
    }

    /// px/s between the newest point and the oldest one inside the window.
    pub fn velocity(&self) -> (f32, f32) {
        let Some(&(t1, x1, y1)) = self.points.back() else {
            return (0.0, 0.0);
        };
        let oldest = self
            .points
            .iter()
            .find(|(t, _, _)| t1.saturating_sub(*t) <= VELOCITY_WINDOW_MS);

        match oldest {
            Some(&(t0, x0, y0)) if t1 > t0 => {
                let dt = (t1 - t0) as f32 / 1_000.0;
                ((x1 - x0) / dt, (y1 - y0) / dt)
            }
            _ => (0.0, 0.0),
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> GestureThresholds {
        GestureThresholds::default()
    }

    #[test]
    fn distance_past_threshold_commits_in_drag_direction() {
        let t = thresholds();
        assert_eq!(
            classify(PanSample::at(t.commit_distance + 30.0, 4.0), &t),
            GestureOutcome::Commit(SwipeDirection::Right)
        );
        assert_eq!(
            classify(PanSample::at(-(t.commit_distance + 30.0), 4.0), &t),
            GestureOutcome::Commit(SwipeDirection::Left)
        );
    }

    #[test]
    fn short_slow_drag_cancels() {
        let t = thresholds();
        assert_eq!(classify(PanSample::at(40.0, 0.0), &t), GestureOutcome::Cancel);
    }

    #[test]
    fn fast_flick_commits_below_distance() {
        let t = thresholds();
        let flick = PanSample::new(-30.0, 0.0, -(t.commit_velocity + 100.0), 0.0);
        assert_eq!(
            classify(flick, &t),
            GestureOutcome::Commit(SwipeDirection::Left)
        );
    }

    #[test]
    fn flick_back_commits_toward_displacement() {
        let t = thresholds();
        let fast = t.commit_velocity + 200.0;
        assert_eq!(
            classify(PanSample::new(30.0, 0.0, -fast, 0.0), &t),
            GestureOutcome::Commit(SwipeDirection::Right)
        );
        assert_eq!(
            classify(PanSample::new(-30.0, 0.0, fast, 0.0), &t),
            GestureOutcome::Commit(SwipeDirection::Left)
        );
    }

    #[test]
    fn zero_displacement_counts_as_left() {
        assert_eq!(SwipeDirection::from_sign(0.0), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_sign(0.5), SwipeDirection::Right);
        let t = thresholds();
        let flick = PanSample::new(0.0, 0.0, t.commit_velocity + 200.0, 0.0);
        assert_eq!(
            classify(flick, &t),
            GestureOutcome::Commit(SwipeDirection::Left)
        );
    }

    #[test]
    fn upward_fling_wins_over_horizontal_commit() {
        let t = thresholds();
        let fling = PanSample::new(0.0, -100.0, t.commit_velocity + 50.0, -600.0);
        assert_eq!(classify(fling, &t), GestureOutcome::SwipeUp);
    }

    #[test]
    fn slow_upward_drag_is_not_swipe_up() {
        let t = thresholds();
        let slow = PanSample::new(0.0, -100.0, 0.0, -100.0);
        assert_eq!(classify(slow, &t), GestureOutcome::Cancel);
    }

    #[test]
    fn downward_fling_is_not_swipe_up() {
        let t = thresholds();
        let down = PanSample::new(0.0, 150.0, 0.0, 900.0);
        assert_eq!(classify(down, &t), GestureOutcome::Cancel);
    }

    #[test]
    fn moves_below_activation_are_not_tracked() {
        let mut tracker = GestureTracker::new(thresholds());
        tracker.begin();
        assert_eq!(tracker.update(PanSample::at(3.0, 2.0)), None);
        assert!(!tracker.is_panning());

        let tracked = tracker.update(PanSample::at(25.0, 2.0));
        assert_eq!(tracked, Some(PanSample::at(25.0, 2.0)));
        assert!(tracker.is_panning());
    }

    #[test]
    fn release_without_activation_is_tap() {
        let mut tracker = GestureTracker::new(thresholds());
        tracker.begin();
        let _ = tracker.update(PanSample::at(2.0, 1.0));
        assert_eq!(tracker.end(PanSample::at(2.0, 1.0)), GestureOutcome::Tap);
        assert!(!tracker.is_active());
    }

    #[test]
    fn interrupted_stream_resolves_to_cancel() {
        let mut tracker = GestureTracker::new(thresholds());
        assert_eq!(tracker.interrupt(), None);

        tracker.begin();
        let _ = tracker.update(PanSample::at(200.0, 0.0));
        assert_eq!(tracker.interrupt(), Some(GestureOutcome::Cancel));
        assert!(!tracker.is_active());
    }

    #[test]
    fn end_without_begin_cancels() {
        let mut tracker = GestureTracker::new(thresholds());
        assert_eq!(
            tracker.end(PanSample::at(300.0, 0.0)),
            GestureOutcome::Cancel
        );
    }

    #[test]
    fn non_finite_samples_are_neutralised() {
        let t = thresholds();
        let broken = PanSample::new(f32::NAN, f32::INFINITY, f32::NAN, f32::NEG_INFINITY);
        assert_eq!(classify(broken, &t), GestureOutcome::Cancel);
    }

    #[test]
    fn velocity_uses_recent_window() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.record(1_000, 50.0, 50.0), PanSample::default());
        let _ = tracker.record(1_016, 60.0, 50.0);
        let sample = tracker.record(1_032, 70.0, 45.0);

        assert_eq!((sample.dx, sample.dy), (20.0, -5.0));
        assert!((sample.vx - 625.0).abs() < 0.5);
        assert!((sample.vy + 156.25).abs() < 0.5);

        // A pause longer than the window leaves only the newest point.
        let still = tracker.record(1_500, 70.0, 45.0);
        assert_eq!((still.vx, still.vy), (0.0, 0.0));

        tracker.reset();
        assert_eq!(tracker.record(2_000, 0.0, 0.0), PanSample::default());
    }
}
