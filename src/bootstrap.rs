use std::sync::Arc;

use anyhow::Context;
use ideas_db::MemoryStore;
use ideas_events::EventBus;
use ideas_kernel::settings::Settings;
use ideas_kernel::{InitCtx, ModuleRegistry};

use crate::modules::{self, ideas::Idea, ideas::IdeasController};

/// A running application: settings, the idea store and its event bus, and
/// the started module registry.
pub struct App {
    pub settings: Settings,
    pub events: EventBus,
    pub store: Arc<MemoryStore<Idea>>,
    registry: ModuleRegistry,
}

impl App {
    /// Build the store, register modules, then init and start them.
    pub async fn start(settings: Settings) -> anyhow::Result<Self> {
        let events = EventBus::new(settings.store.event_capacity);
        let store = Arc::new(MemoryStore::new().with_events(events.clone()));

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, store.clone());

        let ctx = InitCtx {
            settings: &settings,
            events: &events,
        };
        registry
            .init_all(&ctx)
            .await
            .context("failed to initialize modules")?;
        registry
            .start_all(&ctx)
            .await
            .context("failed to start modules")?;

        Ok(Self {
            settings,
            events,
            store,
            registry,
        })
    }

    /// Controller bound to this app's store and settings
    pub fn controller(&self) -> IdeasController<MemoryStore<Idea>> {
        IdeasController::from_settings(self.store.clone(), &self.settings.ideas)
    }

    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.registry
            .stop_all()
            .await
            .context("failed to stop modules")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideas_events::ChangeKind;

    #[tokio::test]
    async fn started_app_lists_fixtures() {
        let app = App::start(Settings::default()).await.unwrap();
        let ideas = app.controller().ideas().await.unwrap();

        let titles: Vec<_> = ideas.iter().map(|idea| idea.title_str()).collect();
        assert_eq!(titles, vec!["First Idea", "Second Idea"]);
        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn list_refreshes_from_store_events() {
        let app = App::start(Settings::default()).await.unwrap();
        let mut events = app.events.subscribe();
        let mut controller = app.controller();
        controller.set_title("Ship it");
        controller.set_body("Today");

        let idea = controller.add_new_idea().await.unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(event.change, ChangeKind::Created);
        assert_eq!(Some(event.id), idea.id.map(|id| id.get()));

        let items = controller.items().await.unwrap();
        items[0].delete().await.unwrap();
        assert_eq!(events.recv().await.unwrap().change, ChangeKind::Destroyed);

        let titles: Vec<_> = controller
            .ideas()
            .await
            .unwrap()
            .into_iter()
            .map(|idea| idea.title_str().to_string())
            .collect();
        assert_eq!(titles, vec!["Second Idea", "Ship it"]);
        app.shutdown().await.unwrap();
    }
}
