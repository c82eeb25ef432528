use crate::model::record::Record;
use crate::provider::{ElementHandle, ElementProvider, ProviderError};

/// Error type for identity resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("element {index} not found in container {container}")]
    NotFound { container: String, index: usize },
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Resolve an identity key to a live element.
///
/// The first container whose name matches and whose element count covers
/// the index wins; containers sharing a name are tried in project order.
/// No side effects.
pub fn resolve(
    provider: &dyn ElementProvider,
    container_name: &str,
    element_index: usize,
) -> Result<ElementHandle, ResolveError> {
    for item in 1..=provider.item_count() {
        if provider.container_name(item)?.as_deref() != Some(container_name) {
            continue;
        }
        let count = provider.element_count(item)?;
        if (1..=count).contains(&element_index) {
            return Ok(ElementHandle::new(item, element_index));
        }
    }

    Err(ResolveError::NotFound {
        container: container_name.to_string(),
        index: element_index,
    })
}

/// Resolve a record by its identity key
pub fn resolve_record(
    provider: &dyn ElementProvider,
    record: &Record,
) -> Result<ElementHandle, ResolveError> {
    resolve(provider, &record.container_name, record.element_index)
}
