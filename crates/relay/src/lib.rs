//! Room-keyed relay for Lawdesk chat.
//!
//! Every room is a `tokio::sync::broadcast` channel. Sockets join a room,
//! publish events into it, and receive everything published there,
//! including their own frames. A subscriber that falls behind loses the
//! events it missed instead of slowing the room down.
//!
//! # Example
//!
//! ```
//! use relay::{RelayEvent, RoomHub};
//!
//! # async fn example() -> Result<(), relay::Error> {
//! let hub = RoomHub::new();
//! let mut lawyer = hub.join("case-7").await;
//!
//! let event = RelayEvent::parse(r#"{"message": "Hello", "sender": "counsel"}"#)?;
//! hub.publish("case-7", event).await;
//!
//! assert_eq!(lawyer.recv().await.map(|e| e.sender().to_string()), Some("counsel".into()));
//! lawyer.leave().await;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Errors that can occur while relaying.
#[derive(Debug, Error)]
pub enum Error {
    /// The frame is not a chat message or a signal.
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A frame relayed to everyone in a room.
///
/// On the wire this is `{"message": "...", "sender": "..."}` for chat and
/// `{"signal": <any>, "sender": "..."}` for call signaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayEvent {
    Chat { message: String, sender: String },
    Signal { signal: serde_json::Value, sender: String },
}

impl RelayEvent {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize back to the wire shape.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn sender(&self) -> &str {
        match self {
            RelayEvent::Chat { sender, .. } | RelayEvent::Signal { sender, .. } => sender,
        }
    }
}

/// Registry of live rooms.
#[derive(Debug, Clone)]
pub struct RoomHub {
    rooms: Arc<RwLock<HashMap<String, broadcast::Sender<RelayEvent>>>>,
    capacity: usize,
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomHub {
    /// Events buffered per room before slow subscribers start lagging.
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a hub whose rooms buffer `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Join a room, creating it if needed.
    pub async fn join(&self, room: &str) -> Subscription {
        let mut rooms = self.rooms.write().await;
        let sender = rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        let receiver = sender.subscribe();
        debug!(room = %room, subscribers = sender.receiver_count(), "Joined room");

        Subscription {
            room: room.to_string(),
            receiver,
            hub: self.clone(),
        }
    }

    /// Publish an event to a room. Returns how many subscribers it reached.
    pub async fn publish(&self, room: &str, event: RelayEvent) -> usize {
        let rooms = self.rooms.read().await;
        match rooms.get(room) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Number of rooms with at least one subscriber.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn subscriber_count(&self, room: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room).map(|s| s.receiver_count()).unwrap_or(0)
    }

    /// Drop a room once nobody is listening.
    async fn prune(&self, room: &str) {
        let mut rooms = self.rooms.write().await;
        if rooms.get(room).is_some_and(|s| s.receiver_count() == 0) {
            rooms.remove(room);
            debug!(room = %room, "Room closed");
        }
    }
}

/// One socket's membership in a room.
#[derive(Debug)]
pub struct Subscription {
    room: String,
    receiver: broadcast::Receiver<RelayEvent>,
    hub: RoomHub,
}

impl Subscription {
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Wait for the next event, skipping over any this subscriber missed.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(room = %self.room, skipped, "Subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Leave the room, closing it if this was the last subscriber.
    pub async fn leave(self) {
        let Subscription { room, receiver, hub } = self;
        drop(receiver);
        hub.prune(&room).await;
    }
}
