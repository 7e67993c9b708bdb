use crate::ast::{Diagnostic, DiagnosticPhase, ElementNode, Node};
use crate::cleanup::{element_is_empty, is_empty_text};
use crate::render::marks::compose_marks;
use crate::render::registry::RendererProps;
use crate::render::{RenderContext, RenderError, RendererKey};
use crate::view::View;
use std::borrow::Cow;

/// Render a sibling sequence in order. Each node's `index` is its position
/// here; `parent_index` is the index of the enclosing element.
pub fn render_elements<'a>(
    nodes: &'a [Node],
    ctx: &'a RenderContext<'a>,
    parent_index: usize,
) -> Result<Vec<View>, RenderError> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| render_node(node, ctx, index, parent_index))
        .collect()
}

/// Render one node.
pub fn render_node<'a>(
    node: &'a Node,
    ctx: &'a RenderContext<'a>,
    index: usize,
    parent_index: usize,
) -> Result<View, RenderError> {
    match node {
        Node::Text(text) => {
            if is_empty_text(&text.text) {
                return Ok(View::nothing());
            }
            compose_marks(text, ctx, index, parent_index)
        }
        Node::Element(element) => render_element(element, ctx, index, parent_index),
        Node::Unrecognized(value) => {
            let json = value.to_string();
            ctx.report(Diagnostic::error(
                DiagnosticPhase::Dispatch,
                "node.unrecognized",
                format!("Cannot render {json}"),
            ));
            Ok(View::element("div").with_child(View::text(format!("Cannot render {json}"))))
        }
    }
}

fn render_element<'a>(
    element: &'a ElementNode,
    ctx: &'a RenderContext<'a>,
    index: usize,
    parent_index: usize,
) -> Result<View, RenderError> {
    let key = RendererKey::from(element.element_type);

    if ctx.is_disabled(key) {
        return Ok(match ctx.disabled_fallback() {
            Some(fallback) => fallback(element.element_type.as_str(), key),
            None => View::nothing(),
        });
    }
    if ctx.removes_empty(key) && element_is_empty(element) {
        log::debug!("dropping empty {} at {parent_index}/{index}", element.element_type);
        return Ok(View::nothing());
    }

    let children = render_elements(&element.children, ctx, index)?;
    let props = RendererProps {
        ctx,
        key,
        element_type: Some(element.element_type),
        attrs: Cow::Borrowed(&element.attrs),
        reference: None,
        contents: &element.children,
        children,
        index,
        parent_index,
    };
    ctx.registry().get(key)?.render(props)
}
