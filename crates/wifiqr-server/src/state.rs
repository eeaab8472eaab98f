//! Application state shared across handlers.

use std::sync::Arc;

use wifiqr_core::{
    BatchArchiver, Config, JsonStore, LogNotifier, NoopNotifier, Notifier, QrRenderer,
};

/// Archiver over the concrete store and renderer.
pub type Archiver = BatchArchiver<JsonStore, QrRenderer>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Arc<JsonStore>,
    archiver: Archiver,
    notifier: Arc<dyn Notifier>,
}

/// Alias used by routers and handlers.
pub type SharedState = AppState;

impl AppState {
    /// Open the record store and wire up the pipeline from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store cannot be opened.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(JsonStore::open_in(&config.storage.data_dir).await?);
        let notifier: Arc<dyn Notifier> = if config.notifications.enabled {
            Arc::new(LogNotifier)
        } else {
            Arc::new(NoopNotifier)
        };
        Ok(Self::with_parts(config, store, notifier))
    }

    /// Assemble state from already-built collaborators.
    #[must_use]
    pub fn with_parts(config: Config, store: Arc<JsonStore>, notifier: Arc<dyn Notifier>) -> Self {
        let renderer = Arc::new(QrRenderer::new(config.render.module_scale));
        let archiver = BatchArchiver::new(
            Arc::clone(&store),
            renderer,
            config.render.archive_options(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                archiver,
                notifier,
            }),
        }
    }

    /// Loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Record store.
    #[must_use]
    pub fn store(&self) -> &JsonStore {
        &self.inner.store
    }

    /// QR pipeline.
    #[must_use]
    pub fn archiver(&self) -> &Archiver {
        &self.inner.archiver
    }

    /// Creation notification sink.
    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }
}
