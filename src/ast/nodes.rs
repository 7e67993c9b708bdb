use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A single node in the content tree.
///
/// The JSON representation is untagged: objects with a `text` field are text
/// leaves, objects with a known `type` are elements. Anything else is kept as
/// [`Node::Unrecognized`] so one malformed node cannot reject a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(TextNode),
    Element(ElementNode),
    Unrecognized(Value),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode::new(text))
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

}

impl From<TextNode> for Node {
    fn from(value: TextNode) -> Self {
        Node::Text(value)
    }
}

impl From<ElementNode> for Node {
    fn from(value: ElementNode) -> Self {
        Node::Element(value)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A text leaf with independent inline marks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.code = true;
        self
    }
}

/// An element node: a type tag, its attributes, and ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    #[serde(rename = "type")]
    pub element_type: ElementType,

    #[serde(flatten)]
    pub attrs: ElementAttrs,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl ElementNode {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            attrs: ElementAttrs::default(),
            children: Vec::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: ElementAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Build an embed element pointing at `node_id`.
    pub fn embed(node_id: impl Into<String>, node_type: impl Into<String>) -> Self {
        let attrs = ElementAttrs {
            node_id: Some(node_id.into()),
            node_type: Some(node_type.into()),
            ..ElementAttrs::default()
        };
        Self::new(ElementType::Embed)
            .with_attrs(attrs)
            .with_child(TextNode::new(""))
    }
}

/// The closed set of element type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading-one", alias = "heading-1")]
    HeadingOne,
    #[serde(rename = "heading-two", alias = "heading-2")]
    HeadingTwo,
    #[serde(rename = "heading-three", alias = "heading-3")]
    HeadingThree,
    #[serde(rename = "heading-four", alias = "heading-4")]
    HeadingFour,
    #[serde(rename = "heading-five", alias = "heading-5")]
    HeadingFive,
    #[serde(rename = "heading-six", alias = "heading-6")]
    HeadingSix,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "iframe")]
    Iframe,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "bulleted-list")]
    BulletedList,
    #[serde(rename = "numbered-list")]
    NumberedList,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "list-item-child")]
    ListItemChild,
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "table_head")]
    TableHead,
    #[serde(rename = "table_body")]
    TableBody,
    #[serde(rename = "table_row")]
    TableRow,
    #[serde(rename = "table_header_cell")]
    TableHeaderCell,
    #[serde(rename = "table_cell")]
    TableCell,
    #[serde(rename = "block-quote")]
    BlockQuote,
    #[serde(rename = "code-block")]
    CodeBlock,
    #[serde(rename = "embed")]
    Embed,
}

impl ElementType {
    /// The tag as it appears in content JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Paragraph => "paragraph",
            ElementType::HeadingOne => "heading-one",
            ElementType::HeadingTwo => "heading-two",
            ElementType::HeadingThree => "heading-three",
            ElementType::HeadingFour => "heading-four",
            ElementType::HeadingFive => "heading-five",
            ElementType::HeadingSix => "heading-six",
            ElementType::Class => "class",
            ElementType::Link => "link",
            ElementType::Image => "image",
            ElementType::Iframe => "iframe",
            ElementType::Video => "video",
            ElementType::BulletedList => "bulleted-list",
            ElementType::NumberedList => "numbered-list",
            ElementType::ListItem => "list-item",
            ElementType::ListItemChild => "list-item-child",
            ElementType::Table => "table",
            ElementType::TableHead => "table_head",
            ElementType::TableBody => "table_body",
            ElementType::TableRow => "table_row",
            ElementType::TableHeaderCell => "table_header_cell",
            ElementType::TableCell => "table_cell",
            ElementType::BlockQuote => "block-quote",
            ElementType::CodeBlock => "code-block",
            ElementType::Embed => "embed",
        }
    }

    /// Elements whose meaning lives in their attributes rather than children.
    pub fn is_attribute_only(self) -> bool {
        matches!(
            self,
            ElementType::Embed | ElementType::Image | ElementType::Iframe | ElementType::Video
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A width/height value: numeric pixels (any JSON number) or a CSS length
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(f64),
    Css(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{px}"),
            Dimension::Css(s) => f.write_str(s),
        }
    }
}

/// Element attributes.
///
/// Only a handful apply to any given element type; the rest stay `None`.
/// Keys this struct does not know about are preserved in `extra`, which is
/// where custom embed renderers find caller-defined reference fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_in_new_tab: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// External reference key of an embed (or inline-embed link).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// `"Asset"` or a caller-defined entity type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inline: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ElementAttrs {
    /// A caller-defined string field, e.g. a custom entity's `title`.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Copy every field set in `other` over this one.
    pub fn overlay(&mut self, other: ElementAttrs) {
        take(&mut self.id, other.id);
        take(&mut self.class_name, other.class_name);
        take(&mut self.href, other.href);
        take(&mut self.rel, other.rel);
        take(&mut self.title, other.title);
        take(&mut self.open_in_new_tab, other.open_in_new_tab);
        take(&mut self.src, other.src);
        take(&mut self.url, other.url);
        take(&mut self.alt_text, other.alt_text);
        take(&mut self.width, other.width);
        take(&mut self.height, other.height);
        take(&mut self.mime_type, other.mime_type);
        take(&mut self.node_id, other.node_id);
        take(&mut self.node_type, other.node_type);
        take(&mut self.is_inline, other.is_inline);
        self.extra.extend(other.extra);
    }
}

fn take<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
