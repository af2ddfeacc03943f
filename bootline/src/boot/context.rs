//! Shared service context handed to boot units and stage boots.

use bootline_shared::{BootlineError, BootlineResult};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared via Arc across every unit and stage boot of a process.
pub type BootCtx = Arc<BootContext>;

/// Typed service map.
///
/// Units publish services here during boot; later units and stage boots look
/// them up by type. One value per type: providing a type twice replaces the
/// earlier value.
#[derive(Default)]
pub struct BootContext {
    services: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl BootContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provide<T: Send + Sync + 'static>(&self, service: T) {
        self.provide_arc(Arc::new(service));
    }

    pub fn provide_arc<T: Send + Sync + 'static>(&self, service: Arc<T>) {
        let replaced = self
            .services
            .write()
            .insert(TypeId::of::<T>(), service)
            .is_some();
        tracing::debug!(
            service = std::any::type_name::<T>(),
            replaced,
            "Service provided"
        );
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }

    /// Like [`get`](Self::get), but missing services are an error.
    pub fn require<T: Send + Sync + 'static>(&self) -> BootlineResult<Arc<T>> {
        self.get::<T>().ok_or_else(|| {
            BootlineError::InvalidState(format!(
                "service {} has not been provided",
                std::any::type_name::<T>()
            ))
        })
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.read().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

impl std::fmt::Debug for BootContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootContext")
            .field("services", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct AudioConfig {
        volume: u8,
    }

    #[test]
    fn test_provide_and_get() {
        let ctx = BootContext::new();
        assert!(ctx.get::<AudioConfig>().is_none());

        ctx.provide(AudioConfig { volume: 7 });

        assert_eq!(ctx.get::<AudioConfig>().unwrap().volume, 7);
        assert!(ctx.contains::<AudioConfig>());
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_provide_replaces_previous_value() {
        let ctx = BootContext::new();
        ctx.provide(AudioConfig { volume: 1 });
        ctx.provide(AudioConfig { volume: 2 });

        assert_eq!(ctx.get::<AudioConfig>().unwrap().volume, 2);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_require_missing_service() {
        let ctx = BootContext::new();
        let err = ctx.require::<AudioConfig>().unwrap_err();
        assert!(err.to_string().contains("AudioConfig"));
    }
}
