use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use swipedeck_core::{
    DeckConfig, SwipeDeck, TickResult,
    content::{Event, ItemKey, ItemSource, StaticCatalog},
    feed::{Favorites, KeyValueStore, MemoryStore, SeenLedger, UserScope, prepare_feed},
    input::QueuedInput,
    render::DeckScreen,
    stack::MountTracker,
};

use catalog::JsonCatalog;
use discover::DiscoverHost;
use file_store::FileStore;
use script::{Script, ScriptPlayer};

#[path = "main/catalog.rs"]
mod catalog;
#[path = "main/discover.rs"]
mod discover;
#[path = "main/file_store.rs"]
mod file_store;
#[path = "main/script.rs"]
mod script;

/// Frames allowed after the script ends for animations to finish.
const DRAIN_FRAMES: u32 = 240;

/// Plays a scripted session against the discover card deck.
#[derive(Debug, Parser)]
#[command(name = "swipedeck", version, about)]
struct Cli {
    /// JSON array of events. Defaults to the built-in sample catalog.
    #[arg(long)]
    items: Option<PathBuf>,

    /// Session script, one command per line. Defaults to a short demo.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Signed-in user id; omitted means guest.
    #[arg(long)]
    user: Option<String>,

    /// Directory for seen/favorite state. In-memory when omitted.
    #[arg(long)]
    store_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 3)]
    stack_size: usize,

    #[arg(long, default_value_t = 120.0)]
    swipe_threshold: f32,

    #[arg(long, default_value_t = 390.0)]
    screen_width: f32,

    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Keep items this user has already seen in the feed.
    #[arg(long)]
    show_seen: bool,

    #[arg(long)]
    no_undo_animation: bool,
}

impl Cli {
    fn deck_config(&self) -> DeckConfig {
        DeckConfig {
            stack_size: self.stack_size,
            swipe_threshold: self.swipe_threshold,
            screen_width: self.screen_width,
            animate_undo: !self.no_undo_animation,
            ..DeckConfig::default()
        }
        .sanitized()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let items = match &cli.items {
        Some(path) => JsonCatalog::new(path).list()?,
        None => {
            let Ok(items) = StaticCatalog::sample().list();
            items
        }
    };
    let script = match &cli.script {
        Some(path) => Script::load(path)?,
        None => Script::demo(),
    };
    debug!("script: {} commands", script.commands().len());

    match &cli.store_dir {
        Some(dir) => {
            let store = FileStore::open(dir)
                .with_context(|| format!("opening store directory {}", dir.display()))?;
            run(&cli, items, script, store)
        }
        None => run(&cli, items, script, MemoryStore::new()),
    }
}

fn run<S>(cli: &Cli, items: Vec<Event>, script: Script, store: S) -> Result<()>
where
    S: KeyValueStore + Clone,
{
    let scope = UserScope::from_id(cli.user.as_deref());
    let seen = SeenLedger::load(store.clone(), &scope).context("loading seen events")?;
    let favorites = Favorites::load(store, &scope).context("loading favorites")?;

    let feed = prepare_feed(items.clone(), cli.show_seen, |id| seen.is_seen(id));
    info!(
        "discover: {} of {} events to show for {}",
        feed.len(),
        items.len(),
        scope.user_id().unwrap_or("guest")
    );

    let mut host = DiscoverHost::new(seen, favorites);
    host.set_feed(&feed);
    let mut deck = SwipeDeck::new(feed, QueuedInput::new(), host, cli.deck_config());
    let frame_ms = cli.frame_ms.max(1);
    let mut player = ScriptPlayer::new(script.compile(frame_ms));
    let mut mounts = MountTracker::new();

    let mut now = 0_u64;
    let mut drain = DRAIN_FRAMES;
    while !player.is_finished() || (!deck.is_idle() && drain > 0) {
        if player.is_finished() {
            drain -= 1;
        }
        now += frame_ms;

        if player.advance(now, &mut deck) {
            let ledger = deck.listener().seen();
            let feed = prepare_feed(items.clone(), cli.show_seen, |id| ledger.is_seen(id));
            info!("discover: reloaded feed, {} events left", feed.len());
            deck.listener_mut().set_feed(&feed);
            deck.set_items(feed);
        }

        if deck.tick(now) == TickResult::RenderRequested {
            render_frame(&deck, now, &mut mounts);
        }
    }

    let host = deck.listener();
    info!(
        "discover: finished at card {} of {}, {} seen, favorites [{}], details opened [{}]",
        deck.current_index(),
        deck.len(),
        host.seen().len(),
        host.favorites().ids().join(", "),
        host.opened().join(", ")
    );
    if host.store_failures() > 0 {
        warn!(
            "discover: {} writes to the store failed",
            host.store_failures()
        );
    }
    Ok(())
}

fn render_frame<S: KeyValueStore>(
    deck: &SwipeDeck<Event, QueuedInput, DiscoverHost<S>>,
    now: u64,
    mounts: &mut MountTracker<ItemKey<Event>>,
) {
    deck.with_screen(now, |screen| match screen {
        DeckScreen::Empty => debug!("frame {now}: no events"),
        DeckScreen::Exhausted { total, can_undo } => {
            debug!("frame {now}: all {total} events seen (undo available: {can_undo})");
            let _ = mounts.observe(std::iter::empty());
        }
        DeckScreen::Stack {
            layers,
            current_index,
            total,
            animation,
            ..
        } => {
            if let Some(front) = layers.first() {
                debug!(
                    "frame {now}: card {}/{} x={:.1} y={:.1} rot={:.1} {:?}",
                    current_index + 1,
                    total,
                    front.translate_x,
                    front.translate_y,
                    front.rotation_deg,
                    animation
                );
            }
            let diff = mounts.observe(layers.iter().map(|layer| layer.key.clone()));
            if !diff.mounted.is_empty() || !diff.unmounted.is_empty() {
                debug!(
                    "frame {now}: mounted {:?}, unmounted {:?}",
                    diff.mounted, diff.unmounted
                );
            }
        }
    });
}
