use crate::ast::{LINE_BREAK_SENTINEL, TextNode};
use crate::render::registry::RendererProps;
use crate::render::{RenderContext, RenderError, RendererKey};
use crate::view::View;

/// Render a text leaf with its marks.
///
/// Marks nest in a fixed order, outermost first: bold, italic, underline,
/// code. A disabled mark is skipped without dropping the text inside it. The
/// literal text `<br>` renders as a line break.
pub fn compose_marks(
    node: &TextNode,
    ctx: &RenderContext<'_>,
    index: usize,
    parent_index: usize,
) -> Result<View, RenderError> {
    if node.text == LINE_BREAK_SENTINEL {
        return Ok(View::line_break());
    }

    let marks = [
        (node.bold, RendererKey::Bold),
        (node.italic, RendererKey::Italic),
        (node.underline, RendererKey::Underline),
        (node.code, RendererKey::Code),
    ];

    // wrap innermost first.
    let mut view = View::text(&node.text);
    for (set, key) in marks.into_iter().rev() {
        if !set || ctx.is_disabled(key) {
            continue;
        }
        let mut props = RendererProps::new(ctx, key);
        props.children = vec![view];
        props.index = index;
        props.parent_index = parent_index;
        view = ctx.registry().get(key)?.render(props)?;
    }
    Ok(view)
}
