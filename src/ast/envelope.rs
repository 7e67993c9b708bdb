use crate::ast::{ElementNode, ElementType, Node, Reference, TextNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw content payload: either a bare list of top-level nodes or a wrapper
/// object whose `children` hold that list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Nodes(Vec<Node>),
    Document { children: Vec<Node> },
}

impl Content {
    /// The top-level node list, regardless of payload shape.
    pub fn elements(&self) -> &[Node] {
        match self {
            Content::Nodes(nodes) => nodes,
            Content::Document { children } => children,
        }
    }
}

impl From<Vec<Node>> for Content {
    fn from(value: Vec<Node>) -> Self {
        Content::Nodes(value)
    }
}

/// A rich-text field as delivered by the content store.
///
/// Every representation is optional; the store returns whichever ones were
/// requested. `json` is the raw tree, `cleaned` a tree already passed through
/// [`crate::cleanup::cleanup_content`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Content>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaned: Option<Vec<Node>>,
}

impl RichTextField {
    /// The best available tree: `cleaned`, then `json` (cleaned on the fly),
    /// then plain `text` wrapped in a paragraph.
    pub fn content(&self) -> Option<Vec<Node>> {
        if let Some(cleaned) = &self.cleaned {
            return Some(cleaned.clone());
        }
        if let Some(json) = &self.json {
            return Some(crate::cleanup::cleanup_content(json));
        }
        self.text.as_deref().map(rtf_from_text)
    }
}

/// The pre-cleaned tree of a field, if the store supplied one.
pub fn cleaned_content(field: Option<&RichTextField>) -> Option<&[Node]> {
    field.and_then(|f| f.cleaned.as_deref())
}

/// The reference list of a field (empty when absent).
pub fn references(field: Option<&RichTextField>) -> &[Reference] {
    field.map(|f| f.references.as_slice()).unwrap_or_default()
}

/// Wrap plain text in a single paragraph.
pub fn rtf_from_text(text: &str) -> Vec<Node> {
    vec![Node::Element(
        ElementNode::new(ElementType::Paragraph).with_child(TextNode::new(text)),
    )]
}
