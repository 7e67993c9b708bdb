//! Rich-text content tree and JSON envelope.
//!
//! This module defines the **contract** between:
//! 1) the upstream store that produced the content JSON (a CMS rich-text
//!    field), and
//! 2) rendering `Node` trees into views.
//!
//! Design goals:
//! - Closed node kinds, so every renderer `match` is exhaustive.
//! - Loss-free JSON: unknown attributes survive a round-trip in `extra` maps.
//! - Malformed nodes deserialize into [`Node::Unrecognized`] instead of
//!   failing the whole document.

mod diagnostic;
mod envelope;
mod nodes;
mod reference;

pub use diagnostic::*;
pub use envelope::*;
pub use nodes::*;
pub use reference::*;

/// The `nodeType` value that marks an embed as an asset reference.
pub const ASSET_NODE_TYPE: &str = "Asset";

/// Text content rendered as a line break instead of literal text.
pub const LINE_BREAK_SENTINEL: &str = "<br>";
