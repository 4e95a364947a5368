//! Idea item component
//!
//! Wraps one stored idea for in-place editing. The only view state is
//! [`EditState`]; it is published on a `watch` channel so a list view can
//! re-render when it changes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ideas_db::{Record, RecordId, Store, StoreError, StoreResult};
use serde::Serialize;
use tokio::sync::watch;

use super::models::Idea;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditState {
    #[default]
    Viewing,
    Editing,
}

/// Result of pressing edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Viewing -> Editing; nothing was sent to the store
    Started,
    /// The save resolved and the item is back in Viewing
    Saved,
    /// A save for this item is still outstanding; nothing was sent
    SavePending,
    /// The save resolved but the draft was edited while it was in flight;
    /// the item stays in Editing so the newer draft can be saved
    ChangedDuringSave,
}

/// One idea in the list, holding the draft being edited.
pub struct IdeaItem<S> {
    store: Arc<S>,
    idea: Mutex<Idea>,
    state: watch::Sender<EditState>,
    saving: AtomicBool,
}

/// Clears the in-flight flag even if the save future is dropped.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: Store<Idea>> IdeaItem<S> {
    pub fn new(store: Arc<S>, idea: Idea) -> Self {
        let (state, _) = watch::channel(EditState::Viewing);
        Self {
            store,
            idea: Mutex::new(idea),
            state,
            saving: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> EditState {
        *self.state.borrow()
    }

    pub fn is_editing(&self) -> bool {
        self.state() == EditState::Editing
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<EditState> {
        self.state.subscribe()
    }

    /// Snapshot of the current draft
    pub fn idea(&self) -> Idea {
        self.lock_idea().clone()
    }

    pub fn id(&self) -> Option<RecordId> {
        self.lock_idea().id
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.lock_idea().title = Some(title.into());
    }

    pub fn set_body(&self, body: impl Into<String>) {
        self.lock_idea().body = Some(body.into());
    }

    /// Toggle editing.
    ///
    /// From `Viewing` this only enters `Editing`. From `Editing` it saves the
    /// draft and returns to `Viewing` once the store confirms. If the save
    /// fails the item stays in `Editing` and the error is returned so the
    /// caller can surface it or retry. Edits made while the save is in
    /// flight are not part of it; the item then stays in `Editing` too.
    pub async fn edit(&self) -> StoreResult<EditOutcome> {
        match self.state() {
            EditState::Viewing => {
                self.state.send_replace(EditState::Editing);
                tracing::debug!(id = ?self.id(), "idea editing started");
                Ok(EditOutcome::Started)
            }
            EditState::Editing => self.confirm_edit().await,
        }
    }

    async fn confirm_edit(&self) -> StoreResult<EditOutcome> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(id = ?self.id(), "idea save already in flight");
            return Ok(EditOutcome::SavePending);
        }
        let _guard = SavingGuard(&self.saving);

        let draft = self.idea();
        match self.store.save(&draft).await {
            Ok(saved) if self.idea() != draft => {
                tracing::debug!(id = ?saved.id, "idea changed while saving, still editing");
                Ok(EditOutcome::ChangedDuringSave)
            }
            Ok(saved) => {
                self.state.send_replace(EditState::Viewing);
                tracing::info!(id = ?saved.id, "idea saved");
                Ok(EditOutcome::Saved)
            }
            Err(err) => {
                tracing::warn!(id = ?draft.id, error = %err, "idea save failed, still editing");
                Err(err)
            }
        }
    }

    /// Destroy the underlying record. The editing state is left as is; the
    /// list drops the item when the store reports the removal.
    pub async fn delete(&self) -> StoreResult<()> {
        let id = match self.id() {
            Some(id) => id,
            None => {
                tracing::warn!("cannot delete an idea that was never persisted");
                return Err(StoreError::not_persisted(Idea::KIND));
            }
        };

        self.store.destroy(id).await.map_err(|err| {
            tracing::warn!(%id, error = %err, "idea delete failed");
            err
        })?;

        tracing::info!(%id, "idea deleted");
        Ok(())
    }

    fn lock_idea(&self) -> MutexGuard<'_, Idea> {
        self.idea.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
