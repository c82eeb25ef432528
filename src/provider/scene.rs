use crate::model::scene::{Container, Element, SceneDocument};

use super::{ElementHandle, ElementProvider, ProviderError, TextState};

/// A snapshot taken when an edit group opens
#[derive(Debug, Clone)]
struct UndoEntry {
    label: String,
    before: SceneDocument,
}

/// [`ElementProvider`] over an in-memory scene document.
///
/// Edit groups snapshot the document so that [`undo`](SceneProvider::undo)
/// reverts a whole group in one step.
#[derive(Debug, Clone, Default)]
pub struct SceneProvider {
    doc: SceneDocument,
    open_group: Option<UndoEntry>,
    /// Nesting depth of `begin_edit_group` calls still waiting for their end
    group_depth: usize,
    undo_stack: Vec<UndoEntry>,
    revealed: Option<ElementHandle>,
    dirty: bool,
}

impl SceneProvider {
    pub fn new(doc: SceneDocument) -> Self {
        SceneProvider {
            doc,
            ..Default::default()
        }
    }

    pub fn document(&self) -> &SceneDocument {
        &self.doc
    }

    /// Swap in a freshly loaded document. Undo history no longer applies and is dropped.
    pub fn replace_document(&mut self, doc: SceneDocument) {
        self.doc = doc;
        self.open_group = None;
        self.group_depth = 0;
        self.undo_stack.clear();
        self.revealed = None;
        self.dirty = false;
    }

    /// Whether the document changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Revert the most recent edit group. Returns its label.
    pub fn undo(&mut self) -> Option<String> {
        let entry = self.undo_stack.pop()?;
        self.doc = entry.before;
        self.dirty = true;
        Some(entry.label)
    }

    /// The element last passed to `reveal`
    pub fn revealed(&self) -> Option<ElementHandle> {
        self.revealed
    }

    fn container(&self, item: usize) -> Result<Option<&Container>, ProviderError> {
        let scene_item = item
            .checked_sub(1)
            .and_then(|i| self.doc.items.get(i))
            .ok_or_else(|| ProviderError::Access(format!("no project item {}", item)))?;
        Ok(scene_item.as_container())
    }

    fn element(&self, handle: ElementHandle) -> Result<&Element, ProviderError> {
        let container = self.container(handle.item)?.ok_or_else(|| {
            ProviderError::Access(format!("project item {} is not a container", handle.item))
        })?;
        handle
            .element
            .checked_sub(1)
            .and_then(|i| container.elements.get(i))
            .ok_or_else(|| {
                ProviderError::Access(format!(
                    "no element {} in container {}",
                    handle.element, container.name
                ))
            })
    }

    fn element_mut(&mut self, handle: ElementHandle) -> Result<&mut Element, ProviderError> {
        let scene_item = handle
            .item
            .checked_sub(1)
            .and_then(|i| self.doc.items.get_mut(i))
            .ok_or_else(|| ProviderError::Access(format!("no project item {}", handle.item)))?;
        let container = scene_item.as_container_mut().ok_or_else(|| {
            ProviderError::Access(format!("project item {} is not a container", handle.item))
        })?;
        let name = container.name.clone();
        handle
            .element
            .checked_sub(1)
            .and_then(|i| container.elements.get_mut(i))
            .ok_or_else(|| {
                ProviderError::Access(format!("no element {} in container {}", handle.element, name))
            })
    }
}

impl ElementProvider for SceneProvider {
    fn item_count(&self) -> usize {
        self.doc.items.len()
    }

    fn container_name(&self, item: usize) -> Result<Option<String>, ProviderError> {
        Ok(self.container(item)?.map(|c| c.name.clone()))
    }

    fn element_count(&self, item: usize) -> Result<usize, ProviderError> {
        Ok(self.container(item)?.map_or(0, |c| c.elements.len()))
    }

    fn element_name(&self, handle: ElementHandle) -> Result<String, ProviderError> {
        Ok(self.element(handle)?.name.clone())
    }

    fn text_property(&self, handle: ElementHandle) -> Result<Option<TextState>, ProviderError> {
        let element = self.element(handle)?;
        Ok(element.text.as_ref().map(|prop| TextState {
            value: prop.value.clone(),
            expression_driven: prop.is_expression_driven(),
            writable: !element.locked,
        }))
    }

    fn set_text(&mut self, handle: ElementHandle, text: &str) -> Result<(), ProviderError> {
        let element = self.element_mut(handle)?;
        if element.locked {
            return Err(ProviderError::ReadOnly);
        }
        let prop = element.text.as_mut().ok_or_else(|| {
            ProviderError::Access(format!("element {} has no text property", element.name))
        })?;
        if prop.is_expression_driven() {
            return Err(ProviderError::ReadOnly);
        }
        prop.value = Some(text.to_string());
        self.dirty = true;
        Ok(())
    }

    fn begin_edit_group(&mut self, label: &str) {
        // Nested groups fold into the outermost one
        if self.group_depth == 0 {
            self.open_group = Some(UndoEntry {
                label: label.to_string(),
                before: self.doc.clone(),
            });
        }
        self.group_depth += 1;
    }

    fn end_edit_group(&mut self) {
        let Some(depth) = self.group_depth.checked_sub(1) else {
            return;
        };
        self.group_depth = depth;
        if depth == 0
            && let Some(entry) = self.open_group.take()
            && entry.before != self.doc
        {
            self.undo_stack.push(entry);
        }
    }

    fn reveal(&mut self, handle: ElementHandle) -> Result<(), ProviderError> {
        self.element(handle)?;
        self.revealed = Some(handle);
        Ok(())
    }

    fn undo_edit_group(&mut self) -> Option<String> {
        self.undo()
    }
}
