//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::CorixService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Score table loading and tree building
    pub corix: CorixService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// Fails when the configured taxonomy file cannot be loaded.
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<Self> {
        let taxonomy = Arc::new(settings.taxonomy()?);
        let corix = CorixService::new(fs.clone(), taxonomy);

        Ok(Self {
            settings: Arc::new(settings),
            fs,
            corix,
        })
    }
}
