//! Typed publish/subscribe bus connecting simulation outcomes to their consequences.
//!
//! Each event kind has its own payload struct. Listeners subscribe to a payload
//! type, so a listener for one kind can only ever be handed that kind's payload.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use smallvec::SmallVec;
use strum::EnumCount;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use tracing::trace;

use crate::entity::ghost::GhostId;

/// The closed set of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
pub enum EventKind {
    DotCollected,
    PelletCollected,
    GhostCollided,
    GhostEaten,
    PacmanDied,
    PowerModeEnded,
    ScoreChanged,
    GameOver,
    LevelCompleted,
    LevelLoaded,
    ShowNameInput,
    ShowHighScores,
    HighScoreAdded,
    GamePaused,
    GameResumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotCollected;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PelletCollected {
    pub is_power_pellet: bool,
    pub is_path_pellet: bool,
    /// How long the pellet's effect lasts. `None` uses the configured default.
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostCollided {
    pub ghost_scared: bool,
    pub ghost: GhostId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostEaten {
    pub ghost: GhostId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacmanDied {
    /// True when the player has no lives left.
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerModeEnded;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreChanged {
    pub score: f64,
    pub points_added: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOver {
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelCompleted {
    pub score: f64,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLoaded {
    pub level: u32,
    /// The asset path the level was loaded from.
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowNameInput {
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowHighScores;

#[derive(Debug, Clone, PartialEq)]
pub struct HighScoreAdded {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePaused;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResumed;

/// A payload type bound to exactly one [`EventKind`].
pub trait Payload: 'static {
    const KIND: EventKind;

    /// Borrows the payload out of an event of the matching kind.
    fn extract(event: &GameEvent) -> Option<&Self>;
}

macro_rules! game_events {
    ($($name:ident),* $(,)?) => {
        /// A tagged union over every event kind and its payload.
        #[derive(Debug, Clone, PartialEq)]
        pub enum GameEvent {
            $($name($name),)*
        }

        impl GameEvent {
            pub fn kind(&self) -> EventKind {
                match self {
                    $(GameEvent::$name(_) => EventKind::$name,)*
                }
            }
        }

        $(
            impl Payload for $name {
                const KIND: EventKind = EventKind::$name;

                fn extract(event: &GameEvent) -> Option<&Self> {
                    match event {
                        GameEvent::$name(payload) => Some(payload),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            impl From<$name> for GameEvent {
                fn from(payload: $name) -> Self {
                    GameEvent::$name(payload)
                }
            }
        )*
    };
}

game_events!(
    DotCollected,
    PelletCollected,
    GhostCollided,
    GhostEaten,
    PacmanDied,
    PowerModeEnded,
    ScoreChanged,
    GameOver,
    LevelCompleted,
    LevelLoaded,
    ShowNameInput,
    ShowHighScores,
    HighScoreAdded,
    GamePaused,
    GameResumed,
);

/// Handle returned by registration, used to unregister later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&GameEvent)>;

/// The event bus of one game instance.
///
/// It is constructed explicitly and shared by `Rc` with every component that
/// publishes or subscribes, so separate games (and separate tests) never share
/// listeners. Being `!Send`, the bus and everything holding it stay on the
/// thread that created them.
///
/// [`notify`](Self::notify) calls every listener registered for the event's
/// kind synchronously, in registration order. The listener set is captured
/// when dispatch starts: listeners registered or unregistered while an event
/// is being dispatched take effect from the next `notify` call on. Listeners
/// may publish further events; those are dispatched immediately, nested inside
/// the current dispatch.
pub struct EventMediator {
    listeners: RefCell<[Vec<(ListenerId, Listener)>; EventKind::COUNT]>,
    next_id: Cell<u64>,
}

impl Default for EventMediator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventMediator {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(std::array::from_fn(|_| Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Registers a listener for the kind of payload `P`.
    pub fn register<P, F>(&self, listener: F) -> ListenerId
    where
        P: Payload,
        F: Fn(&P) + 'static,
    {
        self.register_kind(P::KIND, move |event| {
            if let Some(payload) = P::extract(event) {
                listener(payload);
            }
        })
    }

    /// Registers a listener that receives the whole event for one kind.
    pub fn register_kind<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&GameEvent) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut()[kind as usize].push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered for `kind`.
    pub fn unregister(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let slot = &mut listeners[kind as usize];
        let before = slot.len();
        slot.retain(|(existing, _)| *existing != id);
        slot.len() != before
    }

    /// Dispatches an event to every listener registered for its kind.
    pub fn notify(&self, event: impl Into<GameEvent>) {
        let event = event.into();
        let kind = event.kind();

        // Snapshot first: listeners are free to (un)register or publish while we iterate.
        let snapshot: SmallVec<[Listener; 4]> = self.listeners.borrow()[kind as usize]
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        trace!(kind = <&'static str>::from(kind), listeners = snapshot.len(), "Dispatching event");

        for listener in snapshot {
            listener(&event);
        }
    }

    /// Number of listeners currently registered for a kind.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow()[kind as usize].len()
    }

    /// Drops every listener, returning the bus to its freshly constructed state.
    pub fn reset(&self) {
        self.listeners.borrow_mut().iter_mut().for_each(Vec::clear);
    }
}

impl std::fmt::Debug for EventMediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.borrow();
        f.debug_struct("EventMediator")
            .field("listeners", &listeners.iter().map(Vec::len).sum::<usize>())
            .finish()
    }
}
