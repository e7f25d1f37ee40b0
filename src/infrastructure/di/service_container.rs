//! Service container for dependency injection
//!
//! Wires up the table source, the explorer service and the session.

use std::sync::Arc;

use crate::application::services::ExplorerService;
use crate::application::ExplorerSession;
use crate::config::Settings;
use crate::infrastructure::traits::{JsonFileSource, TableSource};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Table source abstraction
    pub source: Arc<dyn TableSource>,

    /// Explorer state for this process
    pub session: ExplorerSession,
}

impl ServiceContainer {
    /// Create a container reading the table configured in `settings.data_file`.
    pub fn new(settings: Settings) -> Self {
        let source = Arc::new(JsonFileSource::new(settings.data_file.clone()));
        Self::with_deps(settings, source)
    }

    /// Create a service container with a custom table source (for testing).
    pub fn with_deps(settings: Settings, source: Arc<dyn TableSource>) -> Self {
        let settings = Arc::new(settings);
        let session = ExplorerSession::new(ExplorerService::new(Arc::clone(&source)));

        Self {
            settings,
            source,
            session,
        }
    }
}
