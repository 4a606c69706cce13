//! Backend lookup keyed on [`BackendId`].

use super::{Backend, BackendId, Capabilities};
use crate::anneal::{AnnealConfig, AnnealingBackend};
use crate::error::{OptimizeError, Result};
use crate::variational::VariationalConfig;
use std::collections::BTreeMap;

/// Holds one instance of every backend listed in a [`Capabilities`] set.
pub struct BackendRegistry {
    capabilities: Capabilities,
    backends: BTreeMap<BackendId, Box<dyn Backend>>,
}

impl BackendRegistry {
    /// Builds every backend the capability set allows.
    #[cfg_attr(not(feature = "variational"), allow(unused_variables))]
    pub fn new(
        capabilities: Capabilities,
        anneal: &AnnealConfig,
        variational: &VariationalConfig,
    ) -> Self {
        let mut backends: BTreeMap<BackendId, Box<dyn Backend>> = BTreeMap::new();
        for id in capabilities.iter() {
            match id {
                BackendId::Annealing => {
                    backends.insert(id, Box::new(AnnealingBackend::new(anneal.clone())));
                }
                BackendId::Variational => {
                    #[cfg(feature = "variational")]
                    backends.insert(
                        id,
                        Box::new(crate::variational::VariationalBackend::new(
                            variational.clone(),
                        )),
                    );
                }
            }
        }
        Self {
            capabilities,
            backends,
        }
    }

    /// Installs `backend`, replacing any backend with the same id and
    /// marking that id available.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        let id = backend.id();
        self.capabilities.insert(id);
        self.backends.insert(id, backend);
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Looks up a backend, failing with a dependency error when absent.
    pub fn get(&self, id: BackendId) -> Result<&dyn Backend> {
        self.capabilities.ensure(id)?;
        self.backends
            .get(&id)
            .map(|backend| backend.as_ref())
            .ok_or_else(|| {
                OptimizeError::Internal(format!("backend {id} is advertised but not registered"))
            })
    }

    /// Identifiers of the registered backends, in stable order.
    pub fn ids(&self) -> Vec<BackendId> {
        self.backends.keys().copied().collect()
    }
}
