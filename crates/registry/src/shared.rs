//! Single-writer handle for hosts that share one registry between tasks.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::events::RegistryEvent;
use crate::params::RegistryParams;
use crate::registry::PreconfRegistry;

/// Cloneable handle; every clone refers to the same registry.
///
/// Operations submitted through [`SharedRegistry::transact`] run one at a time in
/// lock acquisition order, each against the state left by the previous one.
///
/// The registry's event journal is unbounded: a long-running host must drain it
/// periodically with [`SharedRegistry::take_events`].
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<PreconfRegistry>>,
}

impl SharedRegistry {
    /// Wrap an existing registry.
    pub fn new(registry: PreconfRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Fresh registry with `params`.
    pub fn with_params(params: RegistryParams) -> Self {
        Self::new(PreconfRegistry::new(params))
    }

    /// Run `f` with exclusive access to the registry.
    pub fn transact<R>(&self, f: impl FnOnce(&mut PreconfRegistry) -> R) -> R {
        let mut registry = self.inner.lock();
        f(&mut registry)
    }

    /// Run `f` with read access to the registry.
    pub fn read<R>(&self, f: impl FnOnce(&PreconfRegistry) -> R) -> R {
        let registry = self.inner.lock();
        f(&registry)
    }

    /// Drain the event journal accumulated since the last call.
    pub fn take_events(&self) -> Vec<RegistryEvent> {
        self.inner.lock().take_events()
    }
}
