//! Weekly scheduling board.
//!
//! [`Board`] owns a [`BoardState`] and a [`ScheduleStore`]. Every gesture is
//! applied locally first and then sent to the store; when the store refuses
//! it, the local change is undone. Gestures take `&mut self`, so one gesture
//! resolves before the next starts.

mod state;
mod store;

pub use state::*;
pub use store::*;

use poolservice_shared::{Slot, format_date};
use time::Date;

use crate::{InstanceChanges, NewInstance};

/// What to do when a drop lands on a day where the client already has a
/// visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    #[default]
    Ask,
    Override,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub client_id: i64,
    pub date: Date,
    pub existing: EntryId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Unchanged,
    Moved,
    Created(i64),
    Deleted,
    Edited,
    /// Nothing was applied, repeat with [`ConflictPolicy::Override`] to go on.
    NeedsConfirmation(Conflict),
    /// The store refused the gesture and the board was rolled back.
    Failed(String),
}

pub struct Board<S: ScheduleStore> {
    store: S,
    state: BoardState,
}

impl<S: ScheduleStore> Board<S> {
    pub async fn open(store: S, anchor: Date) -> poolservice_shared::Result<Self> {
        let mut board = Self {
            store,
            state: BoardState::new(anchor),
        };
        board.reload().await?;

        Ok(board)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Replaces the local view with the store's content for the current week.
    pub async fn reload(&mut self) -> poolservice_shared::Result<()> {
        let anchor = self.state.week_start();
        self.load(anchor).await
    }

    pub async fn go_to_week(&mut self, anchor: Date) -> poolservice_shared::Result<()> {
        self.load(anchor).await
    }

    async fn load(&mut self, anchor: Date) -> poolservice_shared::Result<()> {
        let start = poolservice_shared::week_start(anchor);
        let days = poolservice_shared::week_from(start)?;
        let mut rows = self.store.list_unscheduled().await?;
        rows.extend(self.store.list(days[0], days[6]).await?);

        self.state.reduce(Action::Loaded {
            anchor: start,
            rows,
        });

        Ok(())
    }

    fn check_conflict(
        &self,
        client_id: i64,
        to: Slot,
        ignore: Option<EntryId>,
        policy: ConflictPolicy,
    ) -> Option<Conflict> {
        let Slot::Day(date) = to else {
            return None;
        };

        if policy == ConflictPolicy::Override {
            return None;
        }

        self.state
            .conflict(client_id, date, ignore)
            .map(|existing| Conflict {
                client_id,
                date,
                existing: existing.id,
            })
    }

    /// Reschedules a stored instance. Moving onto the slot the entry already
    /// occupies does nothing; a `from` that disagrees with the board is only
    /// logged.
    #[tracing::instrument(skip(self, from, to), fields(from = %from, to = %to))]
    pub async fn move_instance(
        &mut self,
        id: i64,
        from: Slot,
        to: Slot,
        policy: ConflictPolicy,
    ) -> Outcome {
        if from == to {
            return Outcome::Unchanged;
        }

        let entry_id = EntryId::Stored(id);
        let Some((client_id, current)) = self.state.get(entry_id).map(|e| (e.client_id, e.slot))
        else {
            return Outcome::Failed(format!("instance {id} is not on the board"));
        };

        if current != from {
            tracing::debug!(current = %current, "stale source slot");
        }

        if current == to {
            return Outcome::Unchanged;
        }

        if let Some(conflict) = self.check_conflict(client_id, to, Some(entry_id), policy) {
            return Outcome::NeedsConfirmation(conflict);
        }

        let snapshot = self.state.clone();
        self.state.reduce(Action::Moved { id: entry_id, to });

        match self.store.update(id, InstanceChanges::reschedule(to)).await {
            Ok(_) => Outcome::Moved,
            Err(err) => {
                tracing::warn!(err = %err, "move rejected, reloading week");
                self.resync(snapshot).await;

                Outcome::Failed(err.to_string())
            }
        }
    }

    /// Drops a client on a slot, creating an ad-hoc instance priced at the
    /// client's fixed price.
    #[tracing::instrument(skip(self, target), fields(target = %target))]
    pub async fn create_from_client(
        &mut self,
        client_id: i64,
        target: Slot,
        policy: ConflictPolicy,
    ) -> Outcome {
        if let Some(conflict) = self.check_conflict(client_id, target, None, policy) {
            return Outcome::NeedsConfirmation(conflict);
        }

        let placeholder = Entry::placeholder(client_id, target);
        let EntryId::Local(local) = placeholder.id else {
            return Outcome::Failed("placeholder without local id".to_owned());
        };
        self.state.reduce(Action::Inserted(placeholder));

        match self.store.create(NewInstance::new(client_id, target)).await {
            Ok(row) => {
                let id = row.id;
                self.state.reduce(Action::Replaced { local, row });

                Outcome::Created(id)
            }
            Err(err) => {
                tracing::warn!(err = %err, "create rejected, dropping placeholder");
                self.state.reduce(Action::Removed(EntryId::Local(local)));

                Outcome::Failed(err.to_string())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_instance(&mut self, id: i64) -> Outcome {
        let entry_id = EntryId::Stored(id);
        let (Some(index), Some(entry)) = (
            self.state.position(entry_id),
            self.state.get(entry_id).cloned(),
        ) else {
            return Outcome::Failed(format!("instance {id} is not on the board"));
        };

        self.state.reduce(Action::Removed(entry_id));

        match self.store.delete(id).await {
            Ok(()) => Outcome::Deleted,
            Err(err) => {
                tracing::warn!(err = %err, "delete rejected, restoring instance");
                self.state.reduce(Action::Restored { index, entry });

                Outcome::Failed(err.to_string())
            }
        }
    }

    /// Sends `changes` as is and refreshes the week once the store accepted
    /// them.
    #[tracing::instrument(skip(self))]
    pub async fn edit_instance(&mut self, id: i64, changes: InstanceChanges) -> Outcome {
        if let Err(err) = self.store.update(id, changes).await {
            return Outcome::Failed(err.to_string());
        }

        if let Err(err) = self.reload().await {
            tracing::warn!(err = %err, "refresh after edit failed");
        }

        Outcome::Edited
    }

    async fn resync(&mut self, snapshot: BoardState) {
        if let Err(err) = self.reload().await {
            tracing::error!(
                err = %err,
                week_start = %format_date(snapshot.week_start()),
                "reload failed, restoring previous view"
            );
            self.state = snapshot;
        }
    }
}
