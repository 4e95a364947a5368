pub mod component;
pub mod controller;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use async_trait::async_trait;
use ideas_db::{MemoryStore, Record};
use ideas_kernel::{InitCtx, Module};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

pub use component::{EditOutcome, EditState, IdeaItem};
pub use controller::IdeasController;
pub use models::Idea;

/// Ideas module: owns the idea store and seeds the bootstrap records.
///
/// While running it keeps an audit log of idea changes: a background task
/// writes one `info` line per store event for the idea kind. Views refresh
/// by reading the store or subscribing to the bus themselves.
pub struct IdeasModule {
    store: Arc<MemoryStore<Idea>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl IdeasModule {
    pub fn new(store: Arc<MemoryStore<Idea>>) -> Self {
        Self {
            store,
            watcher: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Module for IdeasModule {
    fn name(&self) -> &'static str {
        "ideas"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.store.seed_fixtures && self.store.is_empty().await {
            let seeded = self
                .store
                .seed(Idea::fixtures())
                .await
                .context("failed to seed idea fixtures")?;
            tracing::info!(module = self.name(), seeded, "idea fixtures seeded");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "ideas module initialized"
        );
        Ok(())
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let mut changes = ctx.events.subscribe();
        let watcher = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(event) if event.kind == Idea::KIND => {
                        tracing::info!(id = event.id, change = ?event.change, "idea changed");
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "idea change watcher lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        let previous = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(watcher);
        if let Some(previous) = previous {
            previous.abort();
        }

        let ideas = self.store.len().await;
        tracing::info!(module = self.name(), ideas, "ideas module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(watcher) = watcher {
            watcher.abort();
        }
        tracing::info!(module = self.name(), "ideas module stopped");
        Ok(())
    }
}

/// Create a new instance of the ideas module
pub fn create_module(store: Arc<MemoryStore<Idea>>) -> Arc<dyn Module> {
    Arc::new(IdeasModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideas_events::EventBus;
    use ideas_kernel::settings::Settings;

    #[tokio::test]
    async fn init_seeds_fixtures_into_empty_store() {
        let store = Arc::new(MemoryStore::new());
        let module = IdeasModule::new(store.clone());
        let settings = Settings::default();
        let events = EventBus::default();
        let ctx = InitCtx {
            settings: &settings,
            events: &events,
        };

        module.init(&ctx).await.unwrap();
        module.init(&ctx).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn seeding_can_be_disabled() {
        let store: Arc<MemoryStore<Idea>> = Arc::new(MemoryStore::new());
        let module = create_module(store.clone());
        let mut settings = Settings::default();
        settings.store.seed_fixtures = false;
        let events = EventBus::default();
        let ctx = InitCtx {
            settings: &settings,
            events: &events,
        };

        module.init(&ctx).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn start_subscribes_and_stop_releases() {
        let store = Arc::new(MemoryStore::new());
        let module = IdeasModule::new(store);
        let settings = Settings::default();
        let events = EventBus::default();
        let ctx = InitCtx {
            settings: &settings,
            events: &events,
        };

        module.start(&ctx).await.unwrap();
        assert_eq!(events.subscriber_count(), 1);
        assert!(module.watcher.lock().unwrap().is_some());

        module.stop().await.unwrap();
        assert!(module.watcher.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn lifecycle_runs_on_a_spawned_task() {
        let store: Arc<MemoryStore<Idea>> = Arc::new(MemoryStore::new());
        let module = create_module(store.clone());

        let lifecycle = tokio::spawn(async move {
            let settings = Settings::default();
            let events = EventBus::default();
            let ctx = InitCtx {
                settings: &settings,
                events: &events,
            };
            module.init(&ctx).await?;
            module.start(&ctx).await?;
            module.stop().await
        });

        lifecycle.await.unwrap().unwrap();
        assert_eq!(store.len().await, 2);
    }
}
