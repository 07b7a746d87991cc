//! cli::context
//!
//! Per-invocation settings shared by every command handler.
//!
//! A command opens the store for its route, applies one operation, and
//! exits. The store restores itself from the registry file on open and
//! publishes on every change, so consecutive invocations see each
//! other's state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::record::Record;
use crate::core::types::RoutePath;
use crate::page::PageStore;
use crate::registry::FileRegistry;
use crate::resource::{HttpResource, OfflineResource, Resource};
use crate::ui::output::Verbosity;
use crate::ui::report::LogReporter;

/// Settings resolved from global flags and the config file.
#[derive(Debug, Clone)]
pub struct Context {
    /// Page the command acts on.
    pub route: RoutePath,
    /// Loaded configuration.
    pub config: Config,
    /// Registry file override from `--registry`.
    pub registry_path: Option<PathBuf>,
    /// Base URL override from `--api`.
    pub api: Option<String>,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

impl Context {
    /// The registry file, from the flag or the config.
    pub fn registry(&self) -> Result<FileRegistry> {
        let path = match &self.registry_path {
            Some(path) => path.clone(),
            None => self.config.registry_path()?,
        };
        debug!(path = %path.display(), "using registry file");
        Ok(FileRegistry::with_path(path))
    }

    /// The resource for this invocation.
    ///
    /// An HTTP resource when a base URL is known, otherwise an offline one.
    pub fn resource(&self) -> Result<Arc<dyn Resource<Record>>> {
        let base_url = self.api.as_deref().or(self.config.base_url());
        match base_url {
            Some(url) => {
                info!(url, "using HTTP resource");
                let dates = self.config.date_normalizer()?;
                let resource = HttpResource::with_options(url, self.config.timeout(), dates)
                    .context("failed to create HTTP client")?;
                Ok(Arc::new(resource))
            }
            None => {
                debug!("no base URL, running offline");
                Ok(Arc::new(OfflineResource::new()))
            }
        }
    }

    /// Open the store for the route, restored from the registry.
    pub fn open_store(&self) -> Result<PageStore<Record>> {
        let store = PageStore::<Record>::builder(self.route.clone(), self.resource()?)
            .registry(Arc::new(self.registry()?))
            .reporter(Arc::new(LogReporter::with_stderr()))
            .page_size(self.config.default_page_size())
            .build();
        Ok(store)
    }
}
