//! Popup messages shown to a single user.

use hecs::Entity;

use crate::components::Position;

/// A message anchored at a position, visible to `recipient` only
#[derive(Debug, Clone, PartialEq)]
pub struct PopupMessage {
    pub position: Position,
    pub recipient: Entity,
    pub text: String,
}

/// Queue of popups produced during a tick (singleton, stored in engine)
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    messages: Vec<PopupMessage>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn popup(&mut self, position: Position, recipient: Entity, text: impl Into<String>) {
        self.messages.push(PopupMessage {
            position,
            recipient,
            text: text.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &PopupMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Hand all queued popups to the caller
    pub fn drain(&mut self) -> Vec<PopupMessage> {
        std::mem::take(&mut self.messages)
    }
}
