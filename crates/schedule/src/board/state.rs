use poolservice_shared::{Slot, Status, week_from, week_start};
use time::Date;
use ulid::Ulid;

use crate::InstanceRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryId {
    Stored(i64),
    /// Placeholder for an instance the store has not acknowledged yet.
    Local(Ulid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub client_id: i64,
    pub slot: Slot,
    pub status: Status,
    pub row: Option<InstanceRow>,
}

impl Entry {
    pub fn placeholder(client_id: i64, slot: Slot) -> Self {
        Self {
            id: EntryId::Local(Ulid::new()),
            client_id,
            slot,
            status: Status::Pending,
            row: None,
        }
    }
}

impl From<InstanceRow> for Entry {
    fn from(row: InstanceRow) -> Self {
        Self {
            id: EntryId::Stored(row.id),
            client_id: row.client_id,
            slot: row.scheduled_date,
            status: row.status,
            row: Some(row),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Loaded { anchor: Date, rows: Vec<InstanceRow> },
    Moved { id: EntryId, to: Slot },
    Inserted(Entry),
    Removed(EntryId),
    Restored { index: usize, entry: Entry },
    Replaced { local: Ulid, row: InstanceRow },
}

/// Local view of one week plus the unscheduled lane.
///
/// Entries keep the order the store returned them in (`scheduled_date, id`);
/// moved and inserted entries go to the end of their new bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    week_start: Date,
    entries: Vec<Entry>,
}

impl BoardState {
    pub fn new(anchor: Date) -> Self {
        Self {
            week_start: week_start(anchor),
            entries: vec![],
        }
    }

    pub fn week_start(&self) -> Date {
        self.week_start
    }

    pub fn days(&self) -> [Date; 7] {
        week_from(self.week_start).unwrap_or([self.week_start; 7])
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn bucket(&self, slot: Slot) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.slot == slot).collect()
    }

    /// Unscheduled lane first, then the 7 days of the week.
    pub fn buckets(&self) -> Vec<(Slot, Vec<&Entry>)> {
        std::iter::once(Slot::Unscheduled)
            .chain(self.days().into_iter().map(Slot::Day))
            .map(|slot| (slot, self.bucket(slot)))
            .collect()
    }

    /// A non-cancelled entry of the same client already on `day`.
    pub fn conflict(&self, client_id: i64, day: Date, ignore: Option<EntryId>) -> Option<&Entry> {
        self.entries.iter().find(|e| {
            Some(e.id) != ignore
                && e.client_id == client_id
                && e.slot == Slot::Day(day)
                && e.status.is_active()
        })
    }

    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::Loaded { anchor, rows } => {
                self.week_start = week_start(anchor);
                self.entries = rows.into_iter().map(Entry::from).collect();
            }
            Action::Moved { id, to } => {
                let Some(index) = self.position(id) else {
                    return;
                };

                let mut entry = self.entries.remove(index);
                entry.slot = to;
                if let Some(row) = entry.row.as_mut() {
                    row.scheduled_date = to;
                }
                self.entries.push(entry);
            }
            Action::Inserted(entry) => self.entries.push(entry),
            Action::Removed(id) => self.entries.retain(|e| e.id != id),
            Action::Restored { index, entry } => {
                let index = index.min(self.entries.len());
                self.entries.insert(index, entry);
            }
            Action::Replaced { local, row } => {
                if let Some(entry) = self
                    .entries
                    .iter_mut()
                    .find(|e| e.id == EntryId::Local(local))
                {
                    *entry = Entry::from(row);
                }
            }
        }
    }
}
