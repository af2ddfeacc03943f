//! Rebuilds the persisted unit list from the compiled-in registrations.

use super::UnitDescriptor;
use super::catalog::UnitCatalog;
use crate::settings::BootSettings;

/// Descriptors for every unit in the catalog, in catalog order.
pub fn discover(catalog: &UnitCatalog) -> Vec<UnitDescriptor> {
    catalog
        .entries()
        .map(|entry| UnitDescriptor {
            type_id: entry.type_id().to_string(),
            priority: entry.priority(),
        })
        .collect()
}

/// Replace the settings' unit list with the discovered one if they differ.
///
/// Returns true when the settings changed and need saving.
pub fn sync_descriptors(settings: &mut BootSettings, catalog: &UnitCatalog) -> bool {
    let discovered = discover(catalog);
    if discovered == settings.units {
        tracing::debug!(units = discovered.len(), "Boot unit registry up to date");
        return false;
    }

    tracing::info!(
        units = ?catalog.type_ids(),
        "Boot unit registry updated"
    );
    settings.units = discovered;
    true
}
