//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::cosmic::ContentBackend;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The content backend is built once at startup
/// and injected here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog<ContentBackend>,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, backend: ContentBackend) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::new(backend),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the content catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog<ContentBackend> {
        &self.inner.catalog
    }
}
