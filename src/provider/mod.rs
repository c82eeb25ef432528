//! The live element collection that records are reconciled against.
//!
//! [`ElementProvider`] is the seam between the reconciliation core and the
//! host editing environment. [`SceneProvider`] implements it over a
//! [`SceneDocument`](crate::model::SceneDocument) held in memory.

pub mod scene;
#[cfg(test)]
pub mod testing;

pub use scene::SceneProvider;

/// Position of a live element: 1-based project item and 1-based element
/// index within that container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub item: usize,
    pub element: usize,
}

impl ElementHandle {
    pub fn new(item: usize, element: usize) -> Self {
        ElementHandle { item, element }
    }
}

/// Current state of an element's text property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextState {
    /// None when the property carries no real text
    pub value: Option<String>,
    /// The value is computed by a linked expression
    pub expression_driven: bool,
    /// The host permits setting a new value
    pub writable: bool,
}

impl TextState {
    /// Whether a new literal value may be written
    pub fn accepts_text(&self) -> bool {
        self.writable && !self.expression_driven
    }
}

/// Error type for provider access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Reading or writing one item failed; other items are unaffected
    #[error("{0}")]
    Access(String),
    /// The host is gone; nothing further can be read or written
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("element cannot be modified")]
    ReadOnly,
}

/// The live collection of containers and their positioned elements.
///
/// All positions are 1-based. Project items that are not containers report
/// `None` from [`container_name`](ElementProvider::container_name).
pub trait ElementProvider {
    /// Number of project items (containers and non-containers)
    fn item_count(&self) -> usize;

    /// Name of the container at `item`, or `None` if that item is not a container
    fn container_name(&self, item: usize) -> Result<Option<String>, ProviderError>;

    /// Number of elements in the container at `item`
    fn element_count(&self, item: usize) -> Result<usize, ProviderError>;

    fn element_name(&self, handle: ElementHandle) -> Result<String, ProviderError>;

    /// The element's text property, or `None` if it is not text-bearing
    fn text_property(&self, handle: ElementHandle) -> Result<Option<TextState>, ProviderError>;

    fn set_text(&mut self, handle: ElementHandle, text: &str) -> Result<(), ProviderError>;

    /// Open an undo bracket; mutations until `end_edit_group` undo as one step
    fn begin_edit_group(&mut self, label: &str);

    fn end_edit_group(&mut self);

    /// Make the element the host's current selection
    fn reveal(&mut self, _handle: ElementHandle) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Revert the most recent edit group, returning its label.
    /// `None` when there is nothing to undo or the host keeps no history.
    fn undo_edit_group(&mut self) -> Option<String> {
        None
    }
}
