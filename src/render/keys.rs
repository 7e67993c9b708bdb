use crate::ast::ElementType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical renderer key: what the registry, the disabled set and the
/// remove-empty set are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKey {
    P,
    Bold,
    Italic,
    Underline,
    Code,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Class,
    A,
    Img,
    Iframe,
    Video,
    Ul,
    Ol,
    Li,
    ListItemChild,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableHeaderCell,
    TableCell,
    Blockquote,
    CodeBlock,
    Embed,
    /// Nested dispatch map keyed by mimeType or mime group.
    #[serde(alias = "asset")]
    EmbedAsset,
    /// Nested dispatch map keyed by custom entity type.
    EmbedNode,
}

impl RendererKey {
    pub const ALL: [RendererKey; 31] = [
        RendererKey::P,
        RendererKey::Bold,
        RendererKey::Italic,
        RendererKey::Underline,
        RendererKey::Code,
        RendererKey::H1,
        RendererKey::H2,
        RendererKey::H3,
        RendererKey::H4,
        RendererKey::H5,
        RendererKey::H6,
        RendererKey::Class,
        RendererKey::A,
        RendererKey::Img,
        RendererKey::Iframe,
        RendererKey::Video,
        RendererKey::Ul,
        RendererKey::Ol,
        RendererKey::Li,
        RendererKey::ListItemChild,
        RendererKey::Table,
        RendererKey::TableHead,
        RendererKey::TableBody,
        RendererKey::TableRow,
        RendererKey::TableHeaderCell,
        RendererKey::TableCell,
        RendererKey::Blockquote,
        RendererKey::CodeBlock,
        RendererKey::Embed,
        RendererKey::EmbedAsset,
        RendererKey::EmbedNode,
    ];

    pub const HEADINGS: [RendererKey; 6] = [
        RendererKey::H1,
        RendererKey::H2,
        RendererKey::H3,
        RendererKey::H4,
        RendererKey::H5,
        RendererKey::H6,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RendererKey::P => "p",
            RendererKey::Bold => "bold",
            RendererKey::Italic => "italic",
            RendererKey::Underline => "underline",
            RendererKey::Code => "code",
            RendererKey::H1 => "h1",
            RendererKey::H2 => "h2",
            RendererKey::H3 => "h3",
            RendererKey::H4 => "h4",
            RendererKey::H5 => "h5",
            RendererKey::H6 => "h6",
            RendererKey::Class => "class",
            RendererKey::A => "a",
            RendererKey::Img => "img",
            RendererKey::Iframe => "iframe",
            RendererKey::Video => "video",
            RendererKey::Ul => "ul",
            RendererKey::Ol => "ol",
            RendererKey::Li => "li",
            RendererKey::ListItemChild => "list_item_child",
            RendererKey::Table => "table",
            RendererKey::TableHead => "table_head",
            RendererKey::TableBody => "table_body",
            RendererKey::TableRow => "table_row",
            RendererKey::TableHeaderCell => "table_header_cell",
            RendererKey::TableCell => "table_cell",
            RendererKey::Blockquote => "blockquote",
            RendererKey::CodeBlock => "code_block",
            RendererKey::Embed => "embed",
            RendererKey::EmbedAsset => "embed_asset",
            RendererKey::EmbedNode => "embed_node",
        }
    }

    /// Keys whose registry entry is a nested map rather than one renderer.
    pub fn is_dispatch_map(self) -> bool {
        matches!(self, RendererKey::EmbedAsset | RendererKey::EmbedNode)
    }

    /// The HTML tag the built-in renderer for this key emits, if it is a
    /// plain wrapping element.
    pub fn default_tag(self) -> Option<&'static str> {
        let tag = match self {
            RendererKey::P => "p",
            RendererKey::Bold => "b",
            RendererKey::Italic => "i",
            RendererKey::Underline => "u",
            RendererKey::Code => "code",
            RendererKey::H1 => "h1",
            RendererKey::H2 => "h2",
            RendererKey::H3 => "h3",
            RendererKey::H4 => "h4",
            RendererKey::H5 => "h5",
            RendererKey::H6 => "h6",
            RendererKey::Ul => "ul",
            RendererKey::Ol => "ol",
            RendererKey::Li => "li",
            RendererKey::Table => "table",
            RendererKey::TableHead => "thead",
            RendererKey::TableBody => "tbody",
            RendererKey::TableRow => "tr",
            RendererKey::TableHeaderCell => "th",
            RendererKey::TableCell => "td",
            RendererKey::Blockquote => "blockquote",
            RendererKey::CodeBlock => "pre",
            RendererKey::Class
            | RendererKey::A
            | RendererKey::Img
            | RendererKey::Iframe
            | RendererKey::Video
            | RendererKey::ListItemChild
            | RendererKey::Embed
            | RendererKey::EmbedAsset
            | RendererKey::EmbedNode => return None,
        };
        Some(tag)
    }
}

impl From<ElementType> for RendererKey {
    fn from(value: ElementType) -> Self {
        match value {
            ElementType::Paragraph => RendererKey::P,
            ElementType::HeadingOne => RendererKey::H1,
            ElementType::HeadingTwo => RendererKey::H2,
            ElementType::HeadingThree => RendererKey::H3,
            ElementType::HeadingFour => RendererKey::H4,
            ElementType::HeadingFive => RendererKey::H5,
            ElementType::HeadingSix => RendererKey::H6,
            ElementType::Class => RendererKey::Class,
            ElementType::Link => RendererKey::A,
            ElementType::Image => RendererKey::Img,
            ElementType::Iframe => RendererKey::Iframe,
            ElementType::Video => RendererKey::Video,
            ElementType::BulletedList => RendererKey::Ul,
            ElementType::NumberedList => RendererKey::Ol,
            ElementType::ListItem => RendererKey::Li,
            ElementType::ListItemChild => RendererKey::ListItemChild,
            ElementType::Table => RendererKey::Table,
            ElementType::TableHead => RendererKey::TableHead,
            ElementType::TableBody => RendererKey::TableBody,
            ElementType::TableRow => RendererKey::TableRow,
            ElementType::TableHeaderCell => RendererKey::TableHeaderCell,
            ElementType::TableCell => RendererKey::TableCell,
            ElementType::BlockQuote => RendererKey::Blockquote,
            ElementType::CodeBlock => RendererKey::CodeBlock,
            ElementType::Embed => RendererKey::Embed,
        }
    }
}

impl fmt::Display for RendererKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown renderer key: {0}")]
pub struct UnknownRendererKey(pub String);

impl FromStr for RendererKey {
    type Err = UnknownRendererKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "asset" {
            return Ok(RendererKey::EmbedAsset);
        }
        RendererKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownRendererKey(s.to_string()))
    }
}
