use std::cell::Cell;
use std::collections::HashSet;

use crate::model::scene::{Container, Element, SceneDocument, SceneItem};

use super::{ElementHandle, ElementProvider, ProviderError, SceneProvider, TextState};

/// Scene used across ops tests.
///
/// Item 1 is a folder, item 2 is `Scene1` with ten elements:
/// 1 "Logo" (plain), 2 "Title" = "Introduction", 3 "Title" = "Hello",
/// 4 "Clock" (expression), 5 "Legal" (locked), 6 "Empty" (no value),
/// 7..=10 "Line N" text elements. Item 3 is `Outro` with "Credits" = "Thanks".
pub fn sample_scene() -> SceneDocument {
    let mut scene1 = Container::new("Scene1")
        .with_element(Element::plain("Logo"))
        .with_element(Element::text("Title", "Introduction"))
        .with_element(Element::text("Title", "Hello"))
        .with_element(Element::expression("Clock", "12:00", "time.toFixed(2)"))
        .with_element(Element::text("Legal", "(c) 2025").locked());
    let mut empty = Element::text("Empty", "");
    if let Some(prop) = empty.text.as_mut() {
        prop.value = None;
    }
    scene1 = scene1.with_element(empty);
    for n in 7..=10 {
        scene1 = scene1.with_element(Element::text(format!("Line {}", n), format!("text {}", n)));
    }

    SceneDocument {
        items: vec![
            SceneItem::Folder {
                name: "Assets".into(),
            },
            SceneItem::Container(scene1),
            SceneItem::Container(Container::new("Outro").with_element(Element::text("Credits", "Thanks"))),
        ],
    }
}

pub fn sample_provider() -> SceneProvider {
    SceneProvider::new(sample_scene())
}

/// Wraps a [`SceneProvider`] and injects faults at chosen places.
#[derive(Debug, Default)]
pub struct FaultyProvider {
    pub inner: SceneProvider,
    /// Project items whose access fails
    pub broken_items: HashSet<usize>,
    /// Elements whose name/text reads fail
    pub broken_reads: HashSet<ElementHandle>,
    /// Elements whose writes fail
    pub broken_writes: HashSet<ElementHandle>,
    /// After this many successful `text_property` calls, the host goes away
    pub unavailable_after: Option<usize>,
    reads: Cell<usize>,
    pub groups_opened: usize,
    pub groups_closed: usize,
}

impl FaultyProvider {
    pub fn new(inner: SceneProvider) -> Self {
        FaultyProvider {
            inner,
            ..Default::default()
        }
    }

    fn check_item(&self, item: usize) -> Result<(), ProviderError> {
        if self.broken_items.contains(&item) {
            return Err(ProviderError::Access(format!("item {} is corrupt", item)));
        }
        Ok(())
    }
}

impl ElementProvider for FaultyProvider {
    fn item_count(&self) -> usize {
        self.inner.item_count()
    }

    fn container_name(&self, item: usize) -> Result<Option<String>, ProviderError> {
        self.check_item(item)?;
        self.inner.container_name(item)
    }

    fn element_count(&self, item: usize) -> Result<usize, ProviderError> {
        self.check_item(item)?;
        self.inner.element_count(item)
    }

    fn element_name(&self, handle: ElementHandle) -> Result<String, ProviderError> {
        if self.broken_reads.contains(&handle) {
            return Err(ProviderError::Access("name unreadable".into()));
        }
        self.inner.element_name(handle)
    }

    fn text_property(&self, handle: ElementHandle) -> Result<Option<TextState>, ProviderError> {
        if let Some(limit) = self.unavailable_after {
            if self.reads.get() >= limit {
                return Err(ProviderError::Unavailable("host closed".into()));
            }
            self.reads.set(self.reads.get() + 1);
        }
        if self.broken_reads.contains(&handle) {
            return Err(ProviderError::Access("text unreadable".into()));
        }
        self.inner.text_property(handle)
    }

    fn set_text(&mut self, handle: ElementHandle, text: &str) -> Result<(), ProviderError> {
        if self.broken_writes.contains(&handle) {
            return Err(ProviderError::Access("write rejected".into()));
        }
        self.inner.set_text(handle, text)
    }

    fn begin_edit_group(&mut self, label: &str) {
        self.groups_opened += 1;
        self.inner.begin_edit_group(label);
    }

    fn end_edit_group(&mut self) {
        self.groups_closed += 1;
        self.inner.end_edit_group();
    }

    fn undo_edit_group(&mut self) -> Option<String> {
        self.inner.undo()
    }
}
