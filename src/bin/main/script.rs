//! Session scripts: one command per line, `#` starts a comment.
//!
//! ```text
//! drag <dx> [dy] [ms]   finger drag, released where it stops (default 200 ms)
//! flick <dx> [dy]       short fast drag, 48 ms
//! cancel <dx>           drag interrupted by the system
//! tap
//! left | right | undo   footer buttons
//! wait <ms>
//! settle                wait until nothing is moving
//! reload                rebuild the feed from unseen events
//! ```

use std::{collections::VecDeque, fs, path::Path};

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use swipedeck_core::{
    DeckListener, RequestKind, SwipeDeck,
    content::DeckItem,
    gesture::{PanSample, VelocityTracker},
    input::{DeckInput, QueuedInput},
};

const DEFAULT_DRAG_MS: u64 = 200;
const FLICK_MS: u64 = 48;
const SETTLE_TIMEOUT_MS: u64 = 5_000;

const DEMO: &str = "\
# pass, cancel, flick, open, undo, save, reload
drag 150
settle
drag 40
settle
flick -60
settle
drag 0 -120 150
settle
undo
settle
right
settle
tap
settle
reload
settle
";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Drag { dx: f32, dy: f32, ms: u64 },
    Cancel { dx: f32 },
    Tap,
    Button(RequestKind),
    Wait(u64),
    Settle,
    Reload,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn demo() -> Self {
        // The demo text is a constant that parses.
        Self::parse(DEMO).unwrap_or_default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut commands = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let command = parse_line(line).with_context(|| format!("line {}", n + 1))?;
            commands.push(command);
        }
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Expands commands into per-frame steps.
    pub fn compile(&self, frame_ms: u64) -> VecDeque<Step> {
        let frame_ms = frame_ms.max(1);
        let mut steps = VecDeque::new();
        for command in &self.commands {
            match *command {
                Command::Drag { dx, dy, ms } => push_drag(&mut steps, dx, dy, ms, frame_ms),
                Command::Cancel { dx } => {
                    steps.push_back(Step::Input(DeckInput::PanBegin));
                    steps.push_back(Step::Input(DeckInput::PanMove(PanSample::at(dx, 0.0))));
                    steps.push_back(Step::NextFrame);
                    steps.push_back(Step::Input(DeckInput::PanCancel));
                    steps.push_back(Step::NextFrame);
                }
                Command::Tap => {
                    steps.push_back(Step::Input(DeckInput::Tap));
                    steps.push_back(Step::NextFrame);
                }
                Command::Button(kind) => steps.push_back(Step::Request(kind)),
                Command::Wait(ms) => steps.push_back(Step::Wait(ms)),
                Command::Settle => steps.push_back(Step::Settle),
                Command::Reload => steps.push_back(Step::Reload),
            }
        }
        steps
    }
}

fn parse_line(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        bail!("empty command");
    };
    let args: Vec<&str> = words.collect();

    let command = match word {
        "drag" => Command::Drag {
            dx: number(&args, 0, "dx")?,
            dy: optional(&args, 1)?.unwrap_or(0.0),
            ms: optional(&args, 2)?.map_or(DEFAULT_DRAG_MS, |ms: f32| ms.max(1.0) as u64),
        },
        "flick" => Command::Drag {
            dx: number(&args, 0, "dx")?,
            dy: optional(&args, 1)?.unwrap_or(0.0),
            ms: FLICK_MS,
        },
        "cancel" => Command::Cancel {
            dx: number(&args, 0, "dx")?,
        },
        "tap" => Command::Tap,
        "left" => Command::Button(RequestKind::SwipeLeft),
        "right" => Command::Button(RequestKind::SwipeRight),
        "undo" => Command::Button(RequestKind::Undo),
        "wait" => Command::Wait(number::<u64>(&args, 0, "ms")?),
        "settle" => Command::Settle,
        "reload" => Command::Reload,
        other => bail!("unknown command `{other}`"),
    };
    Ok(command)
}

fn number<T: std::str::FromStr>(args: &[&str], at: usize, name: &str) -> Result<T> {
    match optional(args, at)? {
        Some(value) => Ok(value),
        None => bail!("missing {name}"),
    }
}

fn optional<T: std::str::FromStr>(args: &[&str], at: usize) -> Result<Option<T>> {
    let Some(raw) = args.get(at) else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => bail!("`{raw}` is not a number"),
    }
}

fn push_drag(steps: &mut VecDeque<Step>, dx: f32, dy: f32, ms: u64, frame_ms: u64) {
    let frames = (ms / frame_ms).max(1);
    let mut tracker = VelocityTracker::new();
    let _ = tracker.record(0, 0.0, 0.0);
    steps.push_back(Step::Input(DeckInput::PanBegin));

    let mut last = PanSample::default();
    for frame in 1..=frames {
        let t = frame as f32 / frames as f32;
        last = tracker.record(frame * frame_ms, dx * t, dy * t);
        steps.push_back(Step::Input(DeckInput::PanMove(last)));
        steps.push_back(Step::NextFrame);
    }
    steps.push_back(Step::Input(DeckInput::PanEnd(last)));
    steps.push_back(Step::NextFrame);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Input(DeckInput),
    Request(RequestKind),
    /// Ends the current frame's batch of steps.
    NextFrame,
    Wait(u64),
    Settle,
    Reload,
}

pub struct ScriptPlayer {
    steps: VecDeque<Step>,
    wait_until: Option<u64>,
}

impl ScriptPlayer {
    pub fn new(steps: VecDeque<Step>) -> Self {
        Self {
            steps,
            wait_until: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs the steps due at `now`. Returns `true` when the script asked
    /// for the feed to be rebuilt.
    pub fn advance<T, L>(&mut self, now: u64, deck: &mut SwipeDeck<T, QueuedInput, L>) -> bool
    where
        T: DeckItem,
        L: DeckListener,
    {
        let mut reload = false;
        while let Some(step) = self.steps.front().copied() {
            match step {
                Step::Input(event) => deck.input_mut().push(event),
                Step::Request(kind) => {
                    if let Err(err) = deck.request(kind) {
                        debug!("script: {err}, retrying next frame");
                        return reload;
                    }
                }
                Step::NextFrame => {
                    self.steps.pop_front();
                    return reload;
                }
                Step::Wait(ms) => {
                    let until = *self.wait_until.get_or_insert(now + ms);
                    if now < until {
                        return reload;
                    }
                    self.wait_until = None;
                }
                Step::Settle => {
                    let until = *self.wait_until.get_or_insert(now + SETTLE_TIMEOUT_MS);
                    let settled = deck.is_idle() && !deck.requests().any_pending();
                    if !settled && now < until {
                        return reload;
                    }
                    if !settled {
                        warn!("script: deck still busy after {SETTLE_TIMEOUT_MS} ms, moving on");
                    }
                    self.wait_until = None;
                }
                Step::Reload => reload = true,
            }
            self.steps.pop_front();
        }
        reload
    }
}

#[cfg(test)]
mod tests {
    use swipedeck_core::{DeckConfig, content::Event};

    use super::*;

    #[test]
    fn parses_commands_and_comments() {
        let script = Script::parse(
            "# warm up\n\
             drag 150\n\
             drag -20 -90 120   # slow lift\n\
             flick 60\n\
             \n\
             left\n\
             wait 300\n\
             cancel 80\n\
             tap\n\
             undo\n\
             settle\n\
             reload\n",
        )
        .unwrap();

        assert_eq!(
            script.commands(),
            &[
                Command::Drag { dx: 150.0, dy: 0.0, ms: DEFAULT_DRAG_MS },
                Command::Drag { dx: -20.0, dy: -90.0, ms: 120 },
                Command::Drag { dx: 60.0, dy: 0.0, ms: FLICK_MS },
                Command::Button(RequestKind::SwipeLeft),
                Command::Wait(300),
                Command::Cancel { dx: 80.0 },
                Command::Tap,
                Command::Button(RequestKind::Undo),
                Command::Settle,
                Command::Reload,
            ]
        );
    }

    #[test]
    fn bad_lines_report_their_number() {
        let err = Script::parse("tap\njump 3\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2");
        assert!(format!("{err:#}").contains("unknown command `jump`"));

        let err = Script::parse("drag\n").unwrap_err();
        assert!(format!("{err:#}").contains("missing dx"));

        let err = Script::parse("wait soon\n").unwrap_err();
        assert!(format!("{err:#}").contains("`soon` is not a number"));
    }

    #[test]
    fn demo_script_parses() {
        assert!(!Script::demo().commands().is_empty());
    }

    #[test]
    fn flick_releases_with_commit_velocity() {
        let steps = Script::parse("flick -60\n").unwrap().compile(16);
        let release = steps.iter().find_map(|step| match step {
            Step::Input(DeckInput::PanEnd(sample)) => Some(*sample),
            _ => None,
        });
        let release = release.unwrap();
        assert_eq!(release.dx, -60.0);
        assert!(release.vx < -DeckConfig::default().swipe_velocity);
    }

    #[test]
    fn played_drag_commits_one_card() {
        let items = vec![Event::new("1", "a"), Event::new("2", "b")];
        let mut deck = SwipeDeck::new(items, QueuedInput::new(), (), DeckConfig::default());
        let mut player =
            ScriptPlayer::new(Script::parse("drag 150\nsettle\n").unwrap().compile(16));

        let mut now = 0;
        while !player.is_finished() && now < 10_000 {
            now += 16;
            assert!(!player.advance(now, &mut deck));
            let _ = deck.tick(now);
        }

        assert!(player.is_finished());
        assert_eq!(deck.current_index(), 1);
    }

    #[test]
    fn rapid_second_press_during_exit_is_dropped() {
        let items = vec![Event::new("1", "a"), Event::new("2", "b"), Event::new("3", "c")];
        let mut deck = SwipeDeck::new(items, QueuedInput::new(), (), DeckConfig::default());
        let script = Script::parse("right\nright\nsettle\nreload\n").unwrap();
        let mut player = ScriptPlayer::new(script.compile(16));

        let mut now = 0;
        let mut reloads = 0;
        while !player.is_finished() && now < 10_000 {
            now += 16;
            if player.advance(now, &mut deck) {
                reloads += 1;
            }
            let _ = deck.tick(now);
        }

        assert_eq!(deck.current_index(), 1);
        assert_eq!(reloads, 1);
    }
}
