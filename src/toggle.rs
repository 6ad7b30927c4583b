use crate::db::MessageStore;
use crate::error::Result;
use crate::models::Message;
use std::collections::HashSet;

/// A fulfillment flip already shown locally but not yet confirmed by the store.
#[derive(Debug, Clone)]
pub struct PendingToggle {
    /// Row as it was before the local flip
    pub snapshot: Message,
    pub target: bool,
}

impl PendingToggle {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }

    pub fn description(&self) -> &'static str {
        if self.target { "marked fulfilled" } else { "marked pending" }
    }
}

/// Tracks which rows have a flip waiting on the store. At most one flip per
/// row is in flight, so every snapshot is a state the store last confirmed.
#[derive(Debug, Default)]
pub struct Toggles {
    in_flight: HashSet<String>,
}

impl Toggles {
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Flips the row locally and returns what is needed to confirm or undo it.
    /// Returns `None` for an unknown row or one whose previous flip is unanswered.
    pub fn begin(&mut self, messages: &mut [Message], id: &str) -> Option<PendingToggle> {
        if self.is_in_flight(id) {
            return None;
        }
        let row = messages.iter_mut().find(|m| m.id == id)?;
        let snapshot = row.clone();
        row.fulfilled = !row.fulfilled;
        self.in_flight.insert(id.to_string());
        Some(PendingToggle {
            target: row.fulfilled,
            snapshot,
        })
    }

    /// Applies the store's answer: the returned row replaces the local one, or on
    /// failure the snapshot is put back and the error handed to the caller.
    pub fn finish(
        &mut self,
        messages: &mut [Message],
        pending: PendingToggle,
        outcome: Result<Message>,
    ) -> Result<()> {
        self.in_flight.remove(pending.id());
        let slot = messages.iter_mut().find(|m| m.id == pending.snapshot.id);
        match outcome {
            Ok(row) => {
                if let Some(slot) = slot {
                    *slot = row;
                }
                Ok(())
            }
            Err(e) => {
                if let Some(slot) = slot {
                    *slot = pending.snapshot;
                }
                Err(e)
            }
        }
    }
}

pub async fn commit<S: MessageStore + ?Sized>(store: &S, pending: &PendingToggle) -> Result<Message> {
    store.set_fulfilled(pending.id(), pending.target).await
}
