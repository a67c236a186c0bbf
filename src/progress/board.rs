use uuid::Uuid;

use super::{CommitOutcome, ProgressError, ProgressTracker};
use crate::domain::aggregates::Order;
use crate::domain::value_objects::{ProgressPercent, UnitKey};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Edit {
    order_id: Uuid,
    key: UnitKey,
    selection: ProgressPercent,
    base_version: u64,
}

/// One operator's editing session over order units.
///
/// A single unit is unlocked at a time; only it accepts a selection. The
/// lock is local to this board and does not coordinate separate operators;
/// the version check on save does that.
#[derive(Clone, Debug, Default)]
pub struct ProgressBoard {
    editing: Option<Edit>,
}

impl ProgressBoard {
    pub fn new() -> Self { Self::default() }

    /// Unlock `key`, starting from its stored value.
    pub fn begin_edit(&mut self, order: &Order, key: UnitKey) -> Result<(), ProgressError> {
        if let Some(edit) = &self.editing {
            if edit.order_id != order.id() || edit.key != key {
                return Err(ProgressError::EditLocked { editing: edit.key.to_string() });
            }
            return Ok(());
        }
        self.editing = Some(Edit { order_id: order.id(), selection: order.progress_of(&key), key, base_version: order.version() });
        Ok(())
    }

    /// Choose a new value for the unlocked unit. Replaces any earlier choice.
    pub fn set_progress(&mut self, order_id: Uuid, key: &UnitKey, value: ProgressPercent) -> Result<(), ProgressError> {
        match &mut self.editing {
            Some(edit) if edit.order_id == order_id && edit.key == *key => {
                edit.selection = value;
                Ok(())
            }
            _ => Err(ProgressError::NotEditing(key.to_string())),
        }
    }

    pub fn editing_key(&self) -> Option<&UnitKey> { self.editing.as_ref().map(|e| &e.key) }

    pub fn selection(&self) -> Option<ProgressPercent> { self.editing.as_ref().map(|e| e.selection) }

    /// Re-base the pending edit on a freshly read order, keeping the selection.
    pub fn refresh(&mut self, order: &Order) {
        if let Some(edit) = self.editing.as_mut().filter(|e| e.order_id == order.id()) {
            edit.base_version = order.version();
        }
    }

    pub fn cancel(&mut self) { self.editing = None; }

    /// Commit the selection. The lock is released only on success; after a
    /// failure the selection stays so the operator can retry.
    pub async fn save(&mut self, tracker: &ProgressTracker) -> Result<CommitOutcome, ProgressError> {
        let edit = self.editing.as_ref().ok_or(ProgressError::NothingToSave)?;
        let outcome = tracker.commit_progress(edit.order_id, &edit.key, edit.selection, Some(edit.base_version)).await?;
        self.editing = None;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::value_objects::Language;
    use crate::progress::tracker::tests::{sample_order, RecordingNotifier};
    use crate::progress::NotificationStatus;
    use crate::store::{InMemoryOrderStore, OrderStore, StoreError};

    async fn setup() -> (ProgressTracker, Arc<InMemoryOrderStore>, Order) {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = store.create(&sample_order(2)).await.unwrap();
        let tracker = ProgressTracker::new(store.clone(), Arc::new(RecordingNotifier::default()));
        (tracker, store, order)
    }

    #[tokio::test]
    async fn test_single_unit_unlocked_at_a_time() {
        let (tracker, _, order) = setup().await;
        let keys = order.unit_keys(Language::Fr);
        let mut board = ProgressBoard::new();

        assert!(matches!(board.set_progress(order.id(), &keys[0], ProgressPercent::P20), Err(ProgressError::NotEditing(_))));
        board.begin_edit(&order, keys[0].clone()).unwrap();
        assert!(matches!(board.begin_edit(&order, keys[1].clone()), Err(ProgressError::EditLocked { .. })));
        assert!(board.set_progress(order.id(), &keys[1], ProgressPercent::P20).is_err());

        board.set_progress(order.id(), &keys[0], ProgressPercent::P40).unwrap();
        board.set_progress(order.id(), &keys[0], ProgressPercent::P60).unwrap();
        assert_eq!(board.selection(), Some(ProgressPercent::P60));

        let outcome = board.save(&tracker).await.unwrap();
        assert_eq!(outcome.notification, NotificationStatus::Sent);
        assert_eq!(outcome.order.progress_of(&keys[0]), ProgressPercent::P60);
        assert_eq!(board.editing_key(), None);
        board.begin_edit(&outcome.order, keys[1].clone()).unwrap();
    }

    #[tokio::test]
    async fn test_failed_save_keeps_selection_for_retry() {
        let (tracker, store, order) = setup().await;
        let keys = order.unit_keys(Language::Fr);

        // Another operator saves first.
        tracker.commit_progress(order.id(), &keys[1], ProgressPercent::P20, None).await.unwrap();

        let mut board = ProgressBoard::new();
        board.begin_edit(&order, keys[0].clone()).unwrap();
        board.set_progress(order.id(), &keys[0], ProgressPercent::P80).unwrap();
        let err = board.save(&tracker).await.unwrap_err();
        assert!(matches!(err, ProgressError::Persistence(StoreError::Conflict { .. })));
        assert_eq!(board.editing_key(), Some(&keys[0]));
        assert_eq!(board.selection(), Some(ProgressPercent::P80));

        let fresh = store.fetch(order.id()).await.unwrap().unwrap();
        board.refresh(&fresh);
        let saved = board.save(&tracker).await.unwrap().order;
        assert_eq!(saved.progress_of(&keys[0]), ProgressPercent::P80);
        assert_eq!(saved.progress_of(&keys[1]), ProgressPercent::P20);
    }

    #[tokio::test]
    async fn test_cancel_and_empty_save() {
        let (tracker, _, order) = setup().await;
        let mut board = ProgressBoard::new();
        assert!(matches!(board.save(&tracker).await, Err(ProgressError::NothingToSave)));
        board.begin_edit(&order, order.unit_keys(Language::Fr).remove(0)).unwrap();
        board.cancel();
        assert_eq!(board.selection(), None);
    }
}
