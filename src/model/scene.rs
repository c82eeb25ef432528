use serde::{Deserialize, Serialize};

/// A scene document: the live collection of containers and elements
/// that records are reconciled against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub items: Vec<SceneItem>,
}

/// A top-level scene item. Only containers hold elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneItem {
    Container(Container),
    Asset { name: String },
    Folder { name: String },
}

impl SceneItem {
    pub fn name(&self) -> &str {
        match self {
            SceneItem::Container(c) => &c.name,
            SceneItem::Asset { name } | SceneItem::Folder { name } => name,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            SceneItem::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            SceneItem::Container(c) => Some(c),
            _ => None,
        }
    }
}

/// A named grouping holding an ordered list of elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Container {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Builder-style helper used by tests and fixtures
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }
}

/// A positioned item inside a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    /// Absent when the element is not text-bearing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextProperty>,
    /// Locked elements refuse text mutation
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Element {
    /// An element without a text property
    pub fn plain(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            text: None,
            locked: false,
        }
    }

    /// A text element holding a literal value
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            text: Some(TextProperty {
                value: Some(value.into()),
                expression: None,
            }),
            locked: false,
        }
    }

    /// A text element whose value is driven by an expression
    pub fn expression(
        name: impl Into<String>,
        value: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Element {
            name: name.into(),
            text: Some(TextProperty {
                value: Some(value.into()),
                expression: Some(expression.into()),
            }),
            locked: false,
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// The text property of an element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextProperty {
    /// None when the property carries no real text
    #[serde(default)]
    pub value: Option<String>,
    /// Linked expression; when set the value is computed, not stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl TextProperty {
    pub fn is_expression_driven(&self) -> bool {
        self.expression.is_some()
    }
}
