//! Content tree -> view tree renderer.
//!
//! This module operates only on the parsed tree and the reference list; it
//! never fetches anything. A render is split in two steps:
//!
//! - [`RichTextRenderer::prepare`] merges the built-in registry and config with
//!   the project and call layers once, producing a [`PreparedRender`].
//! - [`PreparedRender::render`] walks one document and returns a
//!   [`RenderOutput`]: the view plus any diagnostics collected on the way.

mod builtin;
mod dispatch;
mod embed;
mod keys;
mod marks;
mod registry;

pub use builtin::{
    AudioRenderer, ClassRenderer, DefaultRenderer, EmbedRenderer, IFrameRenderer, ImageRenderer,
    LinkRenderer, MediaSource, VideoRenderer, builtin_registry, calculate_class_name, encode_uri,
};
pub use dispatch::{render_elements, render_node};
pub use embed::{
    ResolveError, ResolvedAsset, merge_reference, render_asset, render_embed, resolve_asset,
    resolve_reference,
};
pub use keys::{RendererKey, UnknownRendererKey};
pub use marks::compose_marks;
pub use registry::{
    DisabledFallback, Registry, Renderer, RendererOverrides, RendererProps, SharedRenderer,
    renderer,
};

use crate::ast::{Content, Diagnostic, Node, Reference, Severity};
use crate::cleanup::cleanup_content;
use crate::config::{ClassNameOverrides, ElementTypeMap, RenderConfig};
use crate::table::TableError;
use crate::view::View;
use std::cell::RefCell;
use std::fmt;
use thiserror::Error;

/// Failures that abort a render.
///
/// Per-node problems (missing references, unsupported mime types) are not
/// errors; they become [`Diagnostic`]s and the render carries on.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render asset can only render assets, not {0}")]
    NotAnAsset(String),

    #[error("Render embed can not render assets")]
    AssetInEmbed,

    #[error("no renderer registered for `{0}`")]
    MissingRenderer(RendererKey),

    #[error(transparent)]
    Table(#[from] TableError),

    /// Raised by caller-supplied renderers.
    #[error("{0}")]
    Custom(String),
}

/// Per-call inputs layered on top of the project layer.
#[derive(Clone, Default)]
pub struct RenderOptions {
    pub renderers: RendererOverrides,
    pub config: RenderConfig,

    /// Rendered in place of disabled elements; nothing is rendered when unset.
    pub render_disabled_element: Option<DisabledFallback>,
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("renderers", &self.renderers)
            .field("config", &self.config)
            .field(
                "render_disabled_element",
                &self.render_disabled_element.is_some(),
            )
            .finish()
    }
}

/// Entry point holding the project-wide layer.
#[derive(Debug, Clone, Default)]
pub struct RichTextRenderer {
    project_renderers: RendererOverrides,
    project_config: RenderConfig,
}

impl RichTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_renderers(mut self, renderers: RendererOverrides) -> Self {
        self.project_renderers = renderers;
        self
    }

    pub fn with_project_config(mut self, config: RenderConfig) -> Self {
        self.project_config = config;
        self
    }

    /// Merge default < project < call once. Reuse the result across
    /// documents rendered with the same options.
    pub fn prepare(&self, options: &RenderOptions) -> PreparedRender {
        let registry = Registry::merge(
            &builtin_registry(),
            &[&self.project_renderers, &options.renderers],
        );
        let config = RenderConfig::layered(&[&self.project_config, &options.config]);

        PreparedRender {
            registry,
            disabled: config.disabled_elements.clone(),
            remove_empty: config.effective_remove_empty(),
            class_name_overrides: config.effective_class_name_overrides(),
            class_name: config.class_name.clone(),
            cleanup: config.cleanup.unwrap_or(true),
            match_remote_id: config.match_remote_id.unwrap_or(true),
            render_disabled_element: options.render_disabled_element.clone(),
        }
    }

    /// One-shot render: prepare, then render `content`.
    pub fn render(
        &self,
        content: &Content,
        references: &[Reference],
        options: &RenderOptions,
    ) -> Result<RenderOutput, RenderError> {
        self.prepare(options).render(content, references)
    }
}

/// A fully merged registry and configuration.
#[derive(Clone)]
pub struct PreparedRender {
    registry: Registry,
    disabled: ElementTypeMap,
    remove_empty: ElementTypeMap,
    class_name_overrides: ClassNameOverrides,
    class_name: Option<String>,
    cleanup: bool,
    match_remote_id: bool,
    render_disabled_element: Option<DisabledFallback>,
}

impl PreparedRender {
    /// Clean `content` (unless disabled) and render it inside the root
    /// container.
    pub fn render(
        &self,
        content: &Content,
        references: &[Reference],
    ) -> Result<RenderOutput, RenderError> {
        if self.cleanup {
            let cleaned = cleanup_content(content);
            self.render_nodes(&cleaned, references)
        } else {
            self.render_nodes(content.elements(), references)
        }
    }

    /// Render `nodes` as given, without the cleanup pass.
    pub fn render_nodes(
        &self,
        nodes: &[Node],
        references: &[Reference],
    ) -> Result<RenderOutput, RenderError> {
        let ctx = RenderContext::new(self, references);
        let children = render_elements(nodes, &ctx, 0)?;
        let view = View::element("div")
            .with_opt_attr("class", self.class_name.clone())
            .with_children(children);
        Ok(RenderOutput {
            view,
            diagnostics: ctx.into_diagnostics(),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl fmt::Debug for PreparedRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRender")
            .field("registry", &self.registry)
            .field("disabled", &self.disabled)
            .field("remove_empty", &self.remove_empty)
            .field("class_name_overrides", &self.class_name_overrides)
            .field("class_name", &self.class_name)
            .field("cleanup", &self.cleanup)
            .field("match_remote_id", &self.match_remote_id)
            .finish_non_exhaustive()
    }
}

/// The result of one render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub view: View,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderOutput {
    pub fn to_html(&self) -> String {
        self.view.to_html()
    }
}

/// State shared by every renderer during one render.
pub struct RenderContext<'a> {
    prepared: &'a PreparedRender,
    pub references: &'a [Reference],
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(prepared: &'a PreparedRender, references: &'a [Reference]) -> Self {
        Self {
            prepared,
            references,
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.prepared.registry
    }

    pub fn class_name_overrides(&self) -> &ClassNameOverrides {
        &self.prepared.class_name_overrides
    }

    pub fn is_disabled(&self, key: RendererKey) -> bool {
        self.prepared.disabled.get(&key).copied().unwrap_or(false)
    }

    pub fn removes_empty(&self, key: RendererKey) -> bool {
        self.prepared.remove_empty.get(&key).copied().unwrap_or(false)
    }

    pub fn match_remote_id(&self) -> bool {
        self.prepared.match_remote_id
    }

    pub(crate) fn disabled_fallback(&self) -> Option<&DisabledFallback> {
        self.prepared.render_disabled_element.as_ref()
    }

    /// Record a diagnostic and log it.
    pub fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => log::error!("{diagnostic}"),
            Severity::Warning => log::warn!("{diagnostic}"),
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("references", &self.references.len())
            .field("diagnostics", &self.diagnostics.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ElementNode, ElementType, TextNode};
    use crate::config::RenderConfig;

    fn paragraph(text: &str) -> Node {
        ElementNode::new(ElementType::Paragraph)
            .with_child(TextNode::new(text))
            .into()
    }

    #[test]
    fn root_container_carries_class_name() {
        let options = RenderOptions {
            config: RenderConfig {
                class_name: Some("rich-text".to_string()),
                ..RenderConfig::default()
            },
            ..RenderOptions::default()
        };
        let out = RichTextRenderer::new()
            .render(&vec![paragraph("hi")].into(), &[], &options)
            .unwrap();
        assert_eq!(out.to_html(), r#"<div class="rich-text"><p>hi</p></div>"#);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn project_layer_sits_under_call_layer() {
        let project = RenderConfig {
            class_name_overrides: [("p".to_string(), "project".to_string())].into(),
            class_name: Some("project-root".to_string()),
            ..RenderConfig::default()
        };
        let call = RenderOptions {
            config: RenderConfig {
                class_name_overrides: [("p".to_string(), "call".to_string())].into(),
                ..RenderConfig::default()
            },
            ..RenderOptions::default()
        };
        let out = RichTextRenderer::new()
            .with_project_config(project)
            .render(&vec![paragraph("x")].into(), &[], &call)
            .unwrap();
        assert_eq!(
            out.to_html(),
            r#"<div class="project-root"><p class="call">x</p></div>"#
        );
    }

    #[test]
    fn cleanup_can_be_turned_off() {
        let content: Content = vec![paragraph("a"), paragraph("   ")].into();
        let cleaned = RichTextRenderer::new()
            .render(&content, &[], &RenderOptions::default())
            .unwrap();
        assert_eq!(cleaned.to_html(), "<div><p>a</p></div>");

        let options = RenderOptions {
            config: RenderConfig {
                cleanup: Some(false),
                ..RenderConfig::default()
            },
            ..RenderOptions::default()
        };
        let raw = RichTextRenderer::new()
            .render(&content, &[], &options)
            .unwrap();
        // the whitespace-only text renders nothing, but the paragraph stays.
        assert_eq!(raw.to_html(), "<div><p>a</p><p></p></div>");
    }

    #[test]
    fn prepared_render_is_reusable() {
        let prepared = RichTextRenderer::new().prepare(&RenderOptions::default());
        let first = prepared.render(&vec![paragraph("one")].into(), &[]).unwrap();
        let second = prepared.render(&vec![paragraph("two")].into(), &[]).unwrap();
        assert_eq!(first.view.text_content(), "one");
        assert_eq!(second.view.text_content(), "two");
    }
}
