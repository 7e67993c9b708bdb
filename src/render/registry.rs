//! Renderer capability, renderer props, and the layered registry.

use crate::ast::{ElementAttrs, ElementType, Node, Reference};
use crate::config::ClassNameOverrides;
use crate::render::{RenderContext, RenderError, RendererKey};
use crate::view::View;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Everything a renderer is handed for one node.
pub struct RendererProps<'a> {
    /// Shared render state: registry, references, configuration.
    pub ctx: &'a RenderContext<'a>,

    /// The key this renderer was looked up under.
    pub key: RendererKey,

    /// The element type being rendered; `None` for text-mark wrappers.
    pub element_type: Option<ElementType>,

    /// The node's own attributes, merged with the resolved reference's fields
    /// for embeds.
    pub attrs: Cow<'a, ElementAttrs>,

    /// The resolved reference record, for embeds.
    pub reference: Option<&'a Reference>,

    /// Raw child nodes, for renderers that need structure (e.g. tables).
    pub contents: &'a [Node],

    /// Children, already rendered in document order.
    pub children: Vec<View>,

    pub index: usize,
    pub parent_index: usize,
}

impl<'a> RendererProps<'a> {
    pub(crate) fn new(ctx: &'a RenderContext<'a>, key: RendererKey) -> Self {
        Self {
            ctx,
            key,
            element_type: None,
            attrs: Cow::Owned(ElementAttrs::default()),
            reference: None,
            contents: &[],
            children: Vec::new(),
            index: 0,
            parent_index: 0,
        }
    }

    pub fn class_name_overrides(&self) -> &ClassNameOverrides {
        self.ctx.class_name_overrides()
    }

    /// The rendered children as a single fragment.
    pub fn children_fragment(self) -> View {
        View::fragment(self.children)
    }
}

impl fmt::Debug for RendererProps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererProps")
            .field("key", &self.key)
            .field("element_type", &self.element_type)
            .field("attrs", &self.attrs)
            .field("reference", &self.reference)
            .field("children", &self.children.len())
            .field("index", &self.index)
            .field("parent_index", &self.parent_index)
            .finish()
    }
}

/// A function from node props to a view.
pub trait Renderer: Send + Sync {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(RendererProps<'_>) -> Result<View, RenderError> + Send + Sync,
{
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        self(props)
    }
}

pub type SharedRenderer = Arc<dyn Renderer>;

/// Wrap a closure as a shareable renderer.
pub fn renderer<F>(f: F) -> SharedRenderer
where
    F: Fn(RendererProps<'_>) -> Result<View, RenderError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Renders a disabled node in place of nothing: `(type tag, renderer key)`.
pub type DisabledFallback = Arc<dyn Fn(&str, RendererKey) -> View + Send + Sync>;

/// A partial renderer map supplied by a project or a single call.
#[derive(Clone, Default)]
pub struct RendererOverrides {
    renderers: BTreeMap<RendererKey, SharedRenderer>,
    embed_asset: BTreeMap<String, SharedRenderer>,
    embed_node: BTreeMap<String, SharedRenderer>,
}

impl RendererOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a flat key.
    ///
    /// The nested dispatch keys (`embed_asset`, `embed_node`) are not
    /// renderers; use [`Self::with_asset`] and [`Self::with_embed`].
    pub fn with(mut self, key: RendererKey, r: SharedRenderer) -> Self {
        if key.is_dispatch_map() {
            log::warn!("ignoring flat renderer override for dispatch key `{key}`");
            return self;
        }
        self.renderers.insert(key, r);
        self
    }

    /// Override the asset renderer for a mimeType (`video/mp4`) or group (`video`).
    pub fn with_asset(mut self, mime_key: impl Into<String>, r: SharedRenderer) -> Self {
        self.embed_asset.insert(mime_key.into(), r);
        self
    }

    /// Register a renderer for a custom embed entity type.
    pub fn with_embed(mut self, node_type: impl Into<String>, r: SharedRenderer) -> Self {
        self.embed_node.insert(node_type.into(), r);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty() && self.embed_asset.is_empty() && self.embed_node.is_empty()
    }
}

impl fmt::Debug for RendererOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererOverrides")
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .field("embed_asset", &self.embed_asset.keys().collect::<Vec<_>>())
            .field("embed_node", &self.embed_node.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The merged renderer map used for one render.
#[derive(Clone, Default)]
pub struct Registry {
    renderers: BTreeMap<RendererKey, SharedRenderer>,
    embed_asset: BTreeMap<String, SharedRenderer>,
    embed_node: BTreeMap<String, SharedRenderer>,
}

impl Registry {
    /// An empty registry. Every lookup fails until layers are merged in.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge override layers onto `base`, in increasing precedence.
    ///
    /// Flat keys override key-wise. The nested `embed_asset` / `embed_node`
    /// maps are merged at the inner level: a layer only replaces the inner
    /// keys it sets.
    pub fn merge(base: &Registry, layers: &[&RendererOverrides]) -> Registry {
        let mut out = base.clone();
        for layer in layers {
            out.renderers.extend(
                layer
                    .renderers
                    .iter()
                    .map(|(k, r)| (*k, Arc::clone(r))),
            );
            merge_nested(&mut out.embed_asset, &layer.embed_asset);
            merge_nested(&mut out.embed_node, &layer.embed_node);
        }
        log::debug!(
            "merged renderer registry: {} flat, {} asset, {} embed entries",
            out.renderers.len(),
            out.embed_asset.len(),
            out.embed_node.len()
        );
        out
    }

    /// The renderer for a flat key.
    pub fn get(&self, key: RendererKey) -> Result<&SharedRenderer, RenderError> {
        self.renderers
            .get(&key)
            .ok_or(RenderError::MissingRenderer(key))
    }

    /// Asset renderer for `mime_type`: exact key first, then the group before
    /// the `/`.
    pub fn asset_renderer(&self, mime_type: &str) -> Option<&SharedRenderer> {
        if let Some(r) = self.embed_asset.get(mime_type) {
            return Some(r);
        }
        let group = mime_type.split('/').next().filter(|g| !g.is_empty())?;
        self.embed_asset.get(group)
    }

    /// Renderer for a custom embed entity type.
    pub fn embed_renderer(&self, node_type: &str) -> Option<&SharedRenderer> {
        self.embed_node.get(node_type)
    }

    pub(crate) fn insert(&mut self, key: RendererKey, r: SharedRenderer) {
        self.renderers.insert(key, r);
    }

    pub(crate) fn insert_asset(&mut self, mime_key: &str, r: SharedRenderer) {
        self.embed_asset.insert(mime_key.to_string(), r);
    }
}

fn merge_nested(
    into: &mut BTreeMap<String, SharedRenderer>,
    from: &BTreeMap<String, SharedRenderer>,
) {
    into.extend(from.iter().map(|(k, r)| (k.clone(), Arc::clone(r))));
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .field("embed_asset", &self.embed_asset.keys().collect::<Vec<_>>())
            .field("embed_node", &self.embed_node.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(tag: &'static str) -> SharedRenderer {
        renderer(move |_props| Ok(View::text(tag)))
    }

    fn name_of(r: &SharedRenderer) -> String {
        // renderers here ignore their context, so check them through a real render.
        let prepared = crate::render::RichTextRenderer::new().prepare(&Default::default());
        let ctx = RenderContext::new(&prepared, &[]);
        r.render(RendererProps::new(&ctx, RendererKey::P))
            .unwrap()
            .text_content()
    }

    #[test]
    fn flat_keys_follow_layer_precedence() {
        let mut base = Registry::empty();
        base.insert(RendererKey::P, tagged("default-p"));
        base.insert(RendererKey::H1, tagged("default-h1"));

        let project = RendererOverrides::new()
            .with(RendererKey::P, tagged("project-p"))
            .with(RendererKey::H1, tagged("project-h1"));
        let call = RendererOverrides::new().with(RendererKey::P, tagged("call-p"));

        let merged = Registry::merge(&base, &[&project, &call]);
        assert_eq!(name_of(merged.get(RendererKey::P).unwrap()), "call-p");
        assert_eq!(name_of(merged.get(RendererKey::H1).unwrap()), "project-h1");
        assert!(matches!(
            merged.get(RendererKey::Ul),
            Err(RenderError::MissingRenderer(RendererKey::Ul))
        ));
    }

    #[test]
    fn nested_maps_merge_per_inner_key() {
        let mut base = Registry::empty();
        base.insert_asset("image", tagged("default-image"));
        base.insert_asset("video", tagged("default-video"));

        let project = RendererOverrides::new().with_asset("video", tagged("project-video"));
        let call = RendererOverrides::new().with_asset("video/mp4", tagged("call-mp4"));

        let merged = Registry::merge(&base, &[&project, &call]);
        assert_eq!(name_of(merged.asset_renderer("image/png").unwrap()), "default-image");
        assert_eq!(name_of(merged.asset_renderer("video/mp4").unwrap()), "call-mp4");
        assert_eq!(
            name_of(merged.asset_renderer("video/quicktime").unwrap()),
            "project-video"
        );
        assert!(merged.asset_renderer("text/plain").is_none());
        assert!(merged.asset_renderer("/weird").is_none());
    }

    #[test]
    fn dispatch_keys_are_not_flat_overrides() {
        let overrides = RendererOverrides::new().with(RendererKey::EmbedAsset, tagged("x"));
        assert!(overrides.is_empty());
    }
}
