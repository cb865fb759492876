use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use poolservice_schedule::{
    InstanceChanges, InstanceRow, NewInstance,
    board::{Board, ConflictPolicy, EntryId, Outcome, ScheduleStore, Store},
};
use poolservice_shared::{Error, Money, Result, Slot, Status};
use temp_dir::TempDir;
use time::{Date, macros::date};

mod helpers;

/// Wraps the sqlite store, counts writes and fails them on demand.
#[derive(Clone)]
struct FlakyStore {
    inner: Store,
    fail: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl FlakyStore {
    fn new(inner: Store) -> Self {
        Self {
            inner,
            fail: Arc::new(AtomicBool::new(false)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn fail(&self, value: bool) {
        self.fail.store(value, Ordering::SeqCst);
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Unknown(anyhow::anyhow!("connection reset")));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ScheduleStore for FlakyStore {
    async fn list(&self, start: Date, end: Date) -> Result<Vec<InstanceRow>> {
        self.inner.list(start, end).await
    }

    async fn list_unscheduled(&self) -> Result<Vec<InstanceRow>> {
        self.inner.list_unscheduled().await
    }

    async fn create(&self, input: NewInstance) -> Result<InstanceRow> {
        self.write()?;
        self.inner.create(input).await
    }

    async fn update(&self, id: i64, changes: InstanceChanges) -> Result<InstanceRow> {
        self.write()?;
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.write()?;
        self.inner.delete(id).await
    }
}

const MONDAY: Date = date!(2026 - 02 - 16);
const WEDNESDAY: Date = date!(2026 - 02 - 18);

async fn setup(dir: &TempDir) -> anyhow::Result<(FlakyStore, i64, i64)> {
    let pool = helpers::setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = Store::new(pool.clone());

    let maria = helpers::create_client(&pool, "Maria", Some(Money::new(150, 0))).await?;
    let joao = helpers::create_client(&pool, "Joao", None).await?;

    store
        .create(NewInstance::new(maria, Slot::Day(MONDAY)))
        .await?;
    store
        .create(NewInstance::new(joao, Slot::Day(MONDAY)))
        .await?;
    store
        .create(NewInstance::new(joao, Slot::Unscheduled))
        .await?;

    Ok((FlakyStore::new(store), maria, joao))
}

fn stored_ids(board: &Board<FlakyStore>, slot: Slot) -> Vec<EntryId> {
    board.state().bucket(slot).into_iter().map(|e| e.id).collect()
}

#[tokio::test]
async fn test_open_loads_week_and_drafts() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, _, _) = setup(&dir).await?;

    let board = Board::open(store, WEDNESDAY).await?;

    assert_eq!(board.state().week_start(), date!(2026 - 02 - 15));
    assert_eq!(board.state().bucket(Slot::Day(MONDAY)).len(), 2);
    assert_eq!(board.state().bucket(Slot::Unscheduled).len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_move_to_same_slot_is_noop() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, _, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let before = board.state().clone();
    let id = board.state().bucket(Slot::Day(MONDAY))[0]
        .row
        .as_ref()
        .map(|r| r.id)
        .unwrap();

    let outcome = board
        .move_instance(id, Slot::Day(MONDAY), Slot::Day(MONDAY), ConflictPolicy::Ask)
        .await;

    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(store.writes(), 0);
    assert_eq!(board.state(), &before);

    Ok(())
}

#[tokio::test]
async fn test_move_with_stale_source_onto_current_slot_is_noop() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, maria, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let before = board.state().clone();
    let entry = board
        .state()
        .entries()
        .iter()
        .find(|e| e.client_id == maria)
        .cloned()
        .unwrap();
    let EntryId::Stored(id) = entry.id else {
        panic!("loaded entries are stored");
    };

    let outcome = board
        .move_instance(id, Slot::Day(WEDNESDAY), Slot::Day(MONDAY), ConflictPolicy::Ask)
        .await;

    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(store.writes(), 0);
    assert_eq!(board.state(), &before);

    Ok(())
}

#[tokio::test]
async fn test_move_persists() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, maria, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let entry = board
        .state()
        .entries()
        .iter()
        .find(|e| e.client_id == maria)
        .cloned()
        .unwrap();
    let EntryId::Stored(id) = entry.id else {
        panic!("loaded entries are stored");
    };

    let outcome = board
        .move_instance(id, Slot::Day(MONDAY), Slot::Day(WEDNESDAY), ConflictPolicy::Ask)
        .await;
    assert_eq!(outcome, Outcome::Moved);
    assert_eq!(stored_ids(&board, Slot::Day(WEDNESDAY)), vec![entry.id]);

    board.reload().await?;
    assert_eq!(stored_ids(&board, Slot::Day(WEDNESDAY)), vec![entry.id]);

    let outcome = board
        .move_instance(id, Slot::Day(WEDNESDAY), Slot::Unscheduled, ConflictPolicy::Ask)
        .await;
    assert_eq!(outcome, Outcome::Moved);
    assert_eq!(board.state().bucket(Slot::Unscheduled).len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_failed_move_restores_previous_state() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, _, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let before = board.state().clone();
    let EntryId::Stored(id) = board.state().bucket(Slot::Day(MONDAY))[0].id else {
        panic!("loaded entries are stored");
    };

    store.fail(true);
    let outcome = board
        .move_instance(id, Slot::Day(MONDAY), Slot::Day(WEDNESDAY), ConflictPolicy::Ask)
        .await;

    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(store.writes(), 1);
    assert_eq!(board.state(), &before);

    Ok(())
}

#[tokio::test]
async fn test_move_conflict_needs_confirmation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, _, joao) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let draft = board.state().bucket(Slot::Unscheduled)[0].clone();
    let EntryId::Stored(id) = draft.id else {
        panic!("loaded entries are stored");
    };

    let outcome = board
        .move_instance(id, Slot::Unscheduled, Slot::Day(MONDAY), ConflictPolicy::Ask)
        .await;
    let Outcome::NeedsConfirmation(conflict) = outcome else {
        panic!("expected a conflict, got {outcome:?}");
    };
    assert_eq!(conflict.client_id, joao);
    assert_eq!(conflict.date, MONDAY);
    assert_eq!(store.writes(), 0);
    assert_eq!(board.state().bucket(Slot::Unscheduled).len(), 1);

    let outcome = board
        .move_instance(id, Slot::Unscheduled, Slot::Day(MONDAY), ConflictPolicy::Override)
        .await;
    assert_eq!(outcome, Outcome::Moved);
    assert_eq!(board.state().bucket(Slot::Day(MONDAY)).len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_cancelled_visit_is_not_a_conflict() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, maria, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let EntryId::Stored(id) = board
        .state()
        .entries()
        .iter()
        .find(|e| e.client_id == maria)
        .map(|e| e.id)
        .unwrap()
    else {
        panic!("loaded entries are stored");
    };

    let outcome = board
        .edit_instance(id, InstanceChanges::status(Status::Cancelled))
        .await;
    assert_eq!(outcome, Outcome::Edited);

    let outcome = board
        .create_from_client(maria, Slot::Day(MONDAY), ConflictPolicy::Ask)
        .await;
    assert!(matches!(outcome, Outcome::Created(_)));

    Ok(())
}

#[tokio::test]
async fn test_create_from_client_replaces_placeholder() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, maria, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;

    let outcome = board
        .create_from_client(maria, Slot::Day(WEDNESDAY), ConflictPolicy::Ask)
        .await;
    let Outcome::Created(id) = outcome else {
        panic!("expected creation, got {outcome:?}");
    };

    let bucket = board.state().bucket(Slot::Day(WEDNESDAY));
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].id, EntryId::Stored(id));

    let row = bucket[0].row.as_ref().unwrap();
    assert_eq!(row.template_id, None);
    assert_eq!(row.status, Status::Pending);
    assert_eq!(row.price, Some(Money::new(150, 0)));

    Ok(())
}

#[tokio::test]
async fn test_create_from_client_conflict_and_failure() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, maria, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let before = board.state().clone();

    let outcome = board
        .create_from_client(maria, Slot::Day(MONDAY), ConflictPolicy::Ask)
        .await;
    assert!(matches!(outcome, Outcome::NeedsConfirmation(_)));
    assert_eq!(store.writes(), 0);

    store.fail(true);
    let outcome = board
        .create_from_client(maria, Slot::Unscheduled, ConflictPolicy::Ask)
        .await;
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(board.state(), &before);

    Ok(())
}

#[tokio::test]
async fn test_delete_and_restore_on_failure() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, _, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let before = board.state().clone();
    let ids = stored_ids(&board, Slot::Day(MONDAY));
    let EntryId::Stored(first) = ids[0] else {
        panic!("loaded entries are stored");
    };

    store.fail(true);
    assert!(matches!(
        board.delete_instance(first).await,
        Outcome::Failed(_)
    ));
    assert_eq!(board.state(), &before);

    store.fail(false);
    assert_eq!(board.delete_instance(first).await, Outcome::Deleted);
    assert_eq!(stored_ids(&board, Slot::Day(MONDAY)), vec![ids[1]]);

    board.reload().await?;
    assert_eq!(stored_ids(&board, Slot::Day(MONDAY)), vec![ids[1]]);

    Ok(())
}

#[tokio::test]
async fn test_edit_refreshes_view() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (store, _, _) = setup(&dir).await?;
    let mut board = Board::open(store.clone(), WEDNESDAY).await?;
    let EntryId::Stored(id) = board.state().bucket(Slot::Day(MONDAY))[0].id else {
        panic!("loaded entries are stored");
    };

    let changes = InstanceChanges {
        price: Some(Money::new(99, 0)),
        status: Some(Status::Completed),
        ..Default::default()
    };
    assert_eq!(board.edit_instance(id, changes).await, Outcome::Edited);

    let entry = board.state().get(EntryId::Stored(id)).unwrap();
    assert_eq!(entry.status, Status::Completed);
    assert_eq!(entry.row.as_ref().and_then(|r| r.price), Some(Money::new(99, 0)));

    store.fail(true);
    let outcome = board
        .edit_instance(id, InstanceChanges::status(Status::Pending))
        .await;
    assert!(matches!(outcome, Outcome::Failed(_)));
    assert_eq!(
        board.state().get(EntryId::Stored(id)).map(|e| e.status),
        Some(Status::Completed)
    );

    Ok(())
}
