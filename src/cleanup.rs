//! Emptiness predicate and the pre-render cleanup pass.
//!
//! Both operate on borrowed trees and never mutate their input; `cleanup_*`
//! builds a new tree.

use crate::ast::{Content, ElementNode, ElementType, Node, TextNode};

/// True when `text` is Unicode whitespace only (NBSP included, U+200B not).
pub fn is_empty_text(text: &str) -> bool {
    text.trim().is_empty()
}

/// Classify an element as semantically empty.
///
/// - 0 children: never empty.
/// - 1 child: empty only if that child is a text node with empty text. A lone
///   element child (e.g. a link) never counts as empty, whatever it holds.
/// - 2+ children: empty when every child is empty, recursing through
///   [`node_is_empty`].
///
/// An embed carrying a `nodeId` is never empty.
pub fn element_is_empty(element: &ElementNode) -> bool {
    if element.element_type == ElementType::Embed && element.attrs.node_id.is_some() {
        return false;
    }
    match element.children.as_slice() {
        [] => false,
        [Node::Text(t)] => is_empty_text(&t.text),
        [_] => false,
        children => children.iter().all(node_is_empty),
    }
}

/// Emptiness of an arbitrary node: text by its trimmed text, elements by
/// [`element_is_empty`]. Unrecognized nodes are never empty.
pub fn node_is_empty(node: &Node) -> bool {
    match node {
        Node::Text(t) => is_empty_text(&t.text),
        Node::Element(el) => element_is_empty(el),
        Node::Unrecognized(_) => false,
    }
}

/// True when every top-level node is empty.
pub fn content_is_empty(nodes: &[Node]) -> bool {
    nodes.iter().all(node_is_empty)
}

/// Clean a whole content payload.
pub fn cleanup_content(content: &Content) -> Vec<Node> {
    cleanup_nodes(content.elements())
}

/// Drop empty text, collapse whitespace runs, and drop elements that end up
/// childless.
///
/// Attribute-only elements (embed, image, iframe, video) survive with an
/// empty child list. Running this twice is a no-op.
pub fn cleanup_nodes(nodes: &[Node]) -> Vec<Node> {
    nodes.iter().filter_map(cleanup_node).collect()
}

fn cleanup_node(node: &Node) -> Option<Node> {
    match node {
        Node::Text(t) => {
            if is_empty_text(&t.text) {
                return None;
            }
            Some(Node::Text(TextNode {
                text: collapse_whitespace(&t.text),
                ..t.clone()
            }))
        }
        Node::Element(el) => {
            let children = cleanup_nodes(&el.children);
            if children.is_empty() && !el.element_type.is_attribute_only() {
                return None;
            }
            Some(Node::Element(ElementNode {
                element_type: el.element_type,
                attrs: el.attrs.clone(),
                children,
            }))
        }
        Node::Unrecognized(_) => Some(node.clone()),
    }
}

/// Replace every run of whitespace with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ElementAttrs;

    fn para(children: Vec<Node>) -> ElementNode {
        ElementNode::new(ElementType::Paragraph).with_children(children)
    }

    fn link(children: Vec<Node>) -> Node {
        let attrs = ElementAttrs {
            href: Some("https://x.com".to_string()),
            ..ElementAttrs::default()
        };
        Node::Element(
            ElementNode::new(ElementType::Link)
                .with_attrs(attrs)
                .with_children(children),
        )
    }

    #[test]
    fn whitespace_only_single_child_is_empty() {
        assert!(element_is_empty(&para(vec![Node::text("  \n\t ")])));
        assert!(!element_is_empty(&para(vec![Node::text(" x ")])));
    }

    #[test]
    fn nbsp_is_whitespace_but_zero_width_space_is_content() {
        assert!(is_empty_text("\u{a0} \u{a0}"));
        assert!(!is_empty_text("\u{200b}"));
    }

    #[test]
    fn lone_element_child_is_never_empty() {
        // a lone link wrapping only whitespace still counts as content.
        assert!(!element_is_empty(&para(vec![link(vec![Node::text("   ")])])));
    }

    #[test]
    fn multi_child_recurses() {
        let p = para(vec![Node::text(" "), link(vec![Node::text(" ")])]);
        assert!(element_is_empty(&p));

        let p = para(vec![Node::text(" "), link(vec![Node::text("go")])]);
        assert!(!element_is_empty(&p));
    }

    #[test]
    fn childless_element_is_not_classified_empty() {
        assert!(!element_is_empty(&para(vec![])));
    }

    #[test]
    fn embed_with_node_id_is_never_empty() {
        let embed = ElementNode::embed("abc", "Asset");
        assert!(!element_is_empty(&embed));

        let p = para(vec![Node::text(" "), Node::Element(embed)]);
        assert!(!element_is_empty(&p));
    }

    #[test]
    fn content_empty_requires_every_element_empty() {
        let empty = vec![Node::Element(para(vec![Node::text(" ")]))];
        assert!(content_is_empty(&empty));

        let mixed = vec![
            Node::Element(para(vec![Node::text(" ")])),
            Node::Element(para(vec![Node::text("x")])),
        ];
        assert!(!content_is_empty(&mixed));
    }

    #[test]
    fn cleanup_collapses_and_drops() {
        let nodes = vec![
            Node::Element(para(vec![Node::text("a \n\n b"), Node::text("   ")])),
            Node::Element(para(vec![Node::text(" ")])),
            Node::Element(ElementNode::embed("X", "Asset")),
        ];
        let cleaned = cleanup_nodes(&nodes);
        assert_eq!(cleaned.len(), 2);

        let first = cleaned[0].as_element().unwrap();
        assert_eq!(first.children, vec![Node::text("a b")]);

        let embed = cleaned[1].as_element().unwrap();
        assert_eq!(embed.element_type, ElementType::Embed);
        assert!(embed.children.is_empty());
        assert_eq!(embed.attrs.node_id.as_deref(), Some("X"));
    }

    #[test]
    fn cleanup_preserves_marks_and_input() {
        let nodes = vec![Node::Element(para(vec![Node::Text(
            TextNode::new("Hello   World").bold(),
        )]))];
        let before = nodes.clone();
        let cleaned = cleanup_nodes(&nodes);
        assert_eq!(nodes, before);
        assert_eq!(
            cleaned[0].as_element().unwrap().children,
            vec![Node::Text(TextNode::new("Hello World").bold())]
        );
    }

    #[test]
    fn cleanup_is_idempotent() {
        let nodes = vec![
            Node::Element(para(vec![
                Node::text("  lead  "),
                link(vec![Node::text("\t")]),
                Node::text("x\u{a0}\u{a0}y"),
            ])),
            Node::Element(ElementNode::new(ElementType::BulletedList).with_child(
                ElementNode::new(ElementType::ListItem).with_child(Node::text(" ")),
            )),
        ];
        let once = cleanup_nodes(&nodes);
        let twice = cleanup_nodes(&once);
        assert_eq!(once, twice);
        // the list collapses away entirely: its only item had only whitespace.
        assert_eq!(once.len(), 1);
    }
}
