//! Table of boot unit types compiled into the program.

use crate::pipeline::BoxedUnit;
use bootline_shared::BootlineResult;
use std::sync::Arc;

pub type UnitFactory = fn() -> BootlineResult<BoxedUnit>;

/// Link-time registration of a boot unit type.
///
/// Submit one per unit type with `inventory::submit!`; the set is collected
/// by [`UnitCatalog::from_inventory`].
///
/// ```ignore
/// struct WarmCache;
///
/// inventory::submit! {
///     UnitRegistration::new("game::WarmCache", Some(10), || Ok(Box::new(WarmCache) as BoxedUnit))
/// }
/// ```
pub struct UnitRegistration {
    pub type_id: &'static str,
    pub priority: Option<i32>,
    pub factory: UnitFactory,
}

impl UnitRegistration {
    pub const fn new(type_id: &'static str, priority: Option<i32>, factory: UnitFactory) -> Self {
        Self {
            type_id,
            priority,
            factory,
        }
    }
}

inventory::collect!(UnitRegistration);

type DynFactory = Arc<dyn Fn() -> BootlineResult<BoxedUnit> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct CatalogEntry {
    type_id: String,
    priority: Option<i32>,
    factory: DynFactory,
}

impl CatalogEntry {
    pub(crate) fn type_id(&self) -> &str {
        &self.type_id
    }

    pub(crate) fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub(crate) fn instantiate(&self) -> BootlineResult<BoxedUnit> {
        (self.factory)()
    }
}

/// Explicit registration table mapping type ids to unit factories.
///
/// Entries keep registration order, which is the discovery order used to
/// break priority ties.
#[derive(Clone, Default)]
pub struct UnitCatalog {
    entries: Vec<CatalogEntry>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from every `inventory`-submitted [`UnitRegistration`].
    ///
    /// Link order is not stable across builds, so registrations are taken in
    /// type id order.
    pub fn from_inventory() -> Self {
        let mut registrations = inventory::iter::<UnitRegistration>
            .into_iter()
            .collect::<Vec<_>>();
        registrations.sort_by_key(|registration| registration.type_id);

        let mut catalog = Self::new();
        for registration in registrations {
            let factory = registration.factory;
            catalog.register(registration.type_id, registration.priority, factory);
        }

        tracing::debug!(units = catalog.len(), "Collected compiled-in boot units");
        catalog
    }

    /// Register a unit factory. Re-registering a type id replaces the factory
    /// but keeps its original position.
    pub fn register<F>(
        &mut self,
        type_id: impl Into<String>,
        priority: Option<i32>,
        factory: F,
    ) -> &mut Self
    where
        F: Fn() -> BootlineResult<BoxedUnit> + Send + Sync + 'static,
    {
        let entry = CatalogEntry {
            type_id: type_id.into(),
            priority,
            factory: Arc::new(factory),
        };

        match self
            .entries
            .iter_mut()
            .find(|existing| existing.type_id == entry.type_id)
        {
            Some(existing) => {
                tracing::warn!(type_id = %entry.type_id, "Boot unit registered twice, replacing factory");
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
        self
    }

    pub(crate) fn get(&self, type_id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.type_id == type_id)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.get(type_id).is_some()
    }

    pub fn type_ids(&self) -> Vec<&str> {
        self.entries.iter().map(CatalogEntry::type_id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for UnitCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitCatalog")
            .field("type_ids", &self.type_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::BootCtx;
    use crate::pipeline::BootUnit;
    use async_trait::async_trait;

    struct LinkedUnit;

    #[async_trait]
    impl BootUnit for LinkedUnit {
        async fn run(self: Box<Self>, _ctx: BootCtx) -> BootlineResult<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "linked"
        }
    }

    inventory::submit! {
        UnitRegistration::new("tests::LinkedUnit", Some(7), || Ok(Box::new(LinkedUnit) as BoxedUnit))
    }

    #[test]
    fn test_from_inventory_collects_submitted_units() {
        let catalog = UnitCatalog::from_inventory();
        let entry = catalog.get("tests::LinkedUnit").unwrap();

        assert_eq!(entry.priority(), Some(7));
        assert_eq!(entry.instantiate().unwrap().name(), "linked");
    }

    #[test]
    fn test_reregistration_keeps_position() {
        let mut catalog = UnitCatalog::new();
        catalog
            .register("a", None, || Ok(Box::new(LinkedUnit) as BoxedUnit))
            .register("b", None, || Ok(Box::new(LinkedUnit) as BoxedUnit))
            .register("a", Some(1), || Ok(Box::new(LinkedUnit) as BoxedUnit));

        assert_eq!(catalog.type_ids(), vec!["a", "b"]);
        assert_eq!(catalog.get("a").unwrap().priority(), Some(1));
    }
}
