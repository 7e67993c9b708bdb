//! Framework-neutral output tree.
//!
//! Renderers produce `View` values; nothing here knows about node types or
//! registries. `to_html` is a plain serializer used by the CLI and tests.

use serde::Serialize;

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "source", "track", "wbr"];

/// A rendered view node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Element {
        tag: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attrs: Vec<Attr>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<View>,
    },
    Text {
        value: String,
    },
    /// Children spliced into the parent without a wrapper element.
    Fragment {
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<View>,
    },
}

/// A single attribute. Attribute order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl View {
    pub fn element(tag: impl Into<String>) -> Self {
        View::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        View::Text {
            value: value.into(),
        }
    }

    pub fn fragment(children: Vec<View>) -> Self {
        View::Fragment { children }
    }

    /// The "renders to nothing" value.
    pub fn nothing() -> Self {
        View::Fragment {
            children: Vec::new(),
        }
    }

    pub fn line_break() -> Self {
        View::element("br")
    }

    /// A visible inline error marker.
    pub fn error_marker(message: impl Into<String>) -> Self {
        View::element("span")
            .with_attr("style", "color: red;")
            .with_child(View::text(message))
    }

    /// True when this view produces no output at all.
    pub fn is_nothing(&self) -> bool {
        match self {
            View::Fragment { children } => children.iter().all(View::is_nothing),
            _ => false,
        }
    }

    /// Set (or replace) an attribute. No-op on non-elements.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let View::Element { attrs, .. } = &mut self {
            let name = name.into();
            let value = value.into();
            match attrs.iter_mut().find(|a| a.name == name) {
                Some(existing) => existing.value = value,
                None => attrs.push(Attr { name, value }),
            }
        }
        self
    }

    pub fn with_opt_attr(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.with_attr(name, v),
            None => self,
        }
    }

    pub fn with_child(mut self, child: View) -> Self {
        match &mut self {
            View::Element { children, .. } | View::Fragment { children } => children.push(child),
            View::Text { .. } => {}
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<View>) -> Self {
        match &mut self {
            View::Element { children, .. } | View::Fragment { children } => {
                children.extend(new_children)
            }
            View::Text { .. } => {}
        }
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            View::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            View::Text { value } => out.push_str(value),
            View::Element { children, .. } | View::Fragment { children } => {
                for c in children {
                    c.collect_text(out);
                }
            }
        }
    }

    /// Serialize to an HTML fragment. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            View::Text { value } => out.push_str(&html_escape::encode_text(value)),
            View::Fragment { children } => {
                for c in children {
                    c.write_html(out);
                }
            }
            View::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for a in attrs {
                    out.push(' ');
                    out.push_str(&a.name);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(&a.value));
                    out.push('"');
                }
                out.push('>');

                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }

                for c in children {
                    c.write_html(out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }
}
