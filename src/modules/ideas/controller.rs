use std::sync::Arc;

use ideas_db::{Store, StoreResult};
use ideas_kernel::settings::IdeasSettings;

use super::component::IdeaItem;
use super::models::Idea;

/// Ideas list controller: two input fields and the add action.
pub struct IdeasController<S> {
    store: Arc<S>,
    pub title: Option<String>,
    pub body: Option<String>,
    clear_inputs_after_add: bool,
}

impl<S: Store<Idea>> IdeasController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            title: None,
            body: None,
            clear_inputs_after_add: false,
        }
    }

    pub fn from_settings(store: Arc<S>, settings: &IdeasSettings) -> Self {
        Self::new(store).with_clear_inputs_after_add(settings.clear_inputs_after_add)
    }

    pub fn with_clear_inputs_after_add(mut self, clear: bool) -> Self {
        self.clear_inputs_after_add = clear;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Create one idea from the current inputs.
    ///
    /// Callers that don't care about the outcome may drop the result. Each
    /// call creates a new record, so repeated submissions of the same inputs
    /// produce duplicates.
    pub async fn add_new_idea(&mut self) -> StoreResult<Idea> {
        let draft = Idea::new(self.title.clone(), self.body.clone());

        let idea = self.store.create(draft).await.map_err(|err| {
            tracing::warn!(error = %err, "failed to add idea");
            err
        })?;

        tracing::info!(id = ?idea.id, title = idea.title_str(), "idea added");

        if self.clear_inputs_after_add {
            self.title = None;
            self.body = None;
        }

        Ok(idea)
    }

    /// Current collection, in store order
    pub async fn ideas(&self) -> StoreResult<Vec<Idea>> {
        self.store.all().await
    }

    /// One component per stored idea, all in `Viewing`
    pub async fn items(&self) -> StoreResult<Vec<IdeaItem<S>>> {
        Ok(self
            .ideas()
            .await?
            .into_iter()
            .map(|idea| IdeaItem::new(self.store.clone(), idea))
            .collect())
    }
}
