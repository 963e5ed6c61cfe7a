//! Typed broadcast channel between sibling components.
//!
//! Components that have no reference to each other (profile page, experience
//! manager, timeline, dashboard, navbar) coordinate by publishing [`AppEvent`]s
//! on a shared [`EventBus`] and subscribing to the ones they care about.

use store::SessionUser;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::i18n::Language;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    /// Signed in (`Some`) or signed out (`None`).
    SessionChanged(Option<SessionUser>),
    /// Whether the viewer owns the profile currently on screen.
    OwnershipChanged(bool),
    /// The experience manager finished loading this many entries.
    ExperiencesLoaded(usize),
    ProjectCreated { id: String, slug: String },
    LanguageChanged(Language),
}

#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish to every current subscriber. Returns how many received it.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::debug!(?event, "publish");
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn stream(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Subscriber that skips over lag instead of failing.
pub struct EventStream {
    receiver: broadcast::Receiver<AppEvent>,
}

impl EventStream {
    /// Next event, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
