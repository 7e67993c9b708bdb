//! Reference resolution for embeds and inline-embed links.

use crate::ast::{ASSET_NODE_TYPE, Diagnostic, DiagnosticPhase, ElementAttrs, Reference};
use crate::render::registry::RendererProps;
use crate::render::{RenderContext, RenderError, RendererKey};
use crate::view::View;
use serde_json::{Map, Value};
use std::borrow::Cow;
use thiserror::Error;

/// Why an embed could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No id found for embed node: {0}")]
    NotFound(String),

    #[error("No mimeType found for embed node: {0}")]
    MissingMimeType(String),

    #[error("No url found for embed node: {0}")]
    MissingUrl(String),

    #[error("Unsupported mime type: {0}")]
    UnsupportedMimeType(String),

    #[error("No renderer found for embed type: {0}")]
    MissingEmbedRenderer(String),
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::NotFound(_) => "reference.not_found",
            ResolveError::MissingMimeType(_) => "reference.missing_mime_type",
            ResolveError::MissingUrl(_) => "reference.missing_url",
            ResolveError::UnsupportedMimeType(_) => "reference.unsupported_mime_type",
            ResolveError::MissingEmbedRenderer(_) => "reference.missing_renderer",
        }
    }

    /// Lookup misses (unsupported mime type, unregistered embed type) render
    /// nothing; data problems render a visible marker.
    pub fn has_marker(&self) -> bool {
        !matches!(
            self,
            ResolveError::UnsupportedMimeType(_) | ResolveError::MissingEmbedRenderer(_)
        )
    }
}

/// An asset reference that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAsset<'r> {
    pub reference: &'r Reference,
    pub mime_type: &'r str,
    pub url: &'r str,
}

/// First record matching `node_id`. A matching record with an empty id
/// counts as missing.
pub fn resolve_reference<'r>(
    node_id: &str,
    references: &'r [Reference],
    match_remote_id: bool,
) -> Option<&'r Reference> {
    references
        .iter()
        .find(|r| r.matches(node_id, match_remote_id))
        .filter(|r| !r.id.is_empty())
}

/// Resolve an asset and validate that it carries a mimeType and a url.
pub fn resolve_asset<'r>(
    node_id: &str,
    references: &'r [Reference],
    match_remote_id: bool,
) -> Result<ResolvedAsset<'r>, ResolveError> {
    let reference = resolve_reference(node_id, references, match_remote_id)
        .ok_or_else(|| ResolveError::NotFound(node_id.to_string()))?;
    let mime_type = reference
        .mime_type
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ResolveError::MissingMimeType(node_id.to_string()))?;
    let url = reference
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ResolveError::MissingUrl(node_id.to_string()))?;
    Ok(ResolvedAsset {
        reference,
        mime_type,
        url,
    })
}

/// Overlay a reference's fields onto an element's attributes, reference
/// fields winning. `remoteId` is not carried over.
///
/// A field whose value does not fit the typed attribute of the same name
/// (an object `title`, say) leaves the attribute alone; renderers still see
/// it on `props.reference`.
pub fn merge_reference(attrs: &ElementAttrs, reference: &Reference) -> ElementAttrs {
    let mut merged = attrs.clone();
    merged.overlay(ElementAttrs {
        id: Some(reference.id.clone()),
        mime_type: reference.mime_type.clone(),
        url: reference.url.clone(),
        ..ElementAttrs::default()
    });
    for (key, value) in &reference.fields {
        let field = Map::from_iter([(key.clone(), value.clone())]);
        match serde_json::from_value::<ElementAttrs>(Value::Object(field)) {
            Ok(field) => merged.overlay(field),
            Err(e) => {
                log::debug!("reference {}: {key} kept on the record only ({e})", reference.id)
            }
        }
    }
    merged
}

fn fail(ctx: &RenderContext<'_>, source: &str, err: ResolveError, node_id: &str) -> View {
    let marker = format!("[{source}]: {err}");
    let has_marker = err.has_marker();
    ctx.report(
        Diagnostic::warning(DiagnosticPhase::Resolve, err.code(), marker.clone())
            .with_node_id(node_id),
    );
    if has_marker {
        View::error_marker(marker)
    } else {
        View::nothing()
    }
}

fn with_reference<'a>(
    mut props: RendererProps<'a>,
    reference: &'a Reference,
    key: RendererKey,
) -> RendererProps<'a> {
    props.attrs = Cow::Owned(merge_reference(&props.attrs, reference));
    props.reference = Some(reference);
    props.key = key;
    props
}

/// Render an `Asset` embed through the mime-type dispatch map.
pub fn render_asset(props: RendererProps<'_>) -> Result<View, RenderError> {
    let node_type = props.attrs.node_type.clone().unwrap_or_default();
    if node_type != ASSET_NODE_TYPE {
        return Err(RenderError::NotAnAsset(node_type));
    }
    let node_id = props.attrs.node_id.clone().unwrap_or_default();
    let ctx = props.ctx;

    let asset = match resolve_asset(&node_id, ctx.references, ctx.match_remote_id()) {
        Ok(asset) => asset,
        Err(e) => return Ok(fail(ctx, "RenderAsset", e, &node_id)),
    };
    let Some(renderer) = ctx.registry().asset_renderer(asset.mime_type) else {
        let err = ResolveError::UnsupportedMimeType(asset.mime_type.to_string());
        return Ok(fail(ctx, "RenderAsset", err, &node_id));
    };

    renderer.render(with_reference(props, asset.reference, RendererKey::EmbedAsset))
}

/// Render a custom entity embed through the node-type dispatch map.
///
/// `is_inline` is set for links that carry a `nodeType`.
pub fn render_embed(props: RendererProps<'_>, is_inline: bool) -> Result<View, RenderError> {
    let node_type = props.attrs.node_type.clone().unwrap_or_default();
    if node_type == ASSET_NODE_TYPE {
        return Err(RenderError::AssetInEmbed);
    }
    let node_id = props.attrs.node_id.clone().unwrap_or_default();
    let ctx = props.ctx;

    let Some(reference) = resolve_reference(&node_id, ctx.references, ctx.match_remote_id())
    else {
        return Ok(fail(ctx, "RenderEmbed", ResolveError::NotFound(node_id.clone()), &node_id));
    };
    let Some(renderer) = ctx.registry().embed_renderer(&node_type) else {
        let err = ResolveError::MissingEmbedRenderer(node_type);
        return Ok(fail(ctx, "RenderEmbed", err, &node_id));
    };

    let mut props = with_reference(props, reference, RendererKey::EmbedNode);
    let attrs = props.attrs.to_mut();
    attrs.is_inline = Some(is_inline);
    attrs.node_type = Some(node_type);
    renderer.render(props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Dimension;

    fn refs() -> Vec<Reference> {
        vec![
            Reference::asset("a1", "image/png", "https://cdn/a1.png"),
            Reference::new("a2").with_field("url", "https://cdn/a2"),
            Reference::asset("a3", "image/png", "https://cdn/a3.png").with_remote_id("legacy-3"),
            Reference::new(""),
        ]
    }

    #[test]
    fn resolves_by_id_and_remote_id() {
        let refs = refs();
        assert_eq!(resolve_reference("a1", &refs, true).map(|r| r.id.as_str()), Some("a1"));
        assert_eq!(
            resolve_reference("legacy-3", &refs, true).map(|r| r.id.as_str()),
            Some("a3")
        );
        assert!(resolve_reference("legacy-3", &refs, false).is_none());
        assert!(resolve_reference("nope", &refs, true).is_none());
    }

    #[test]
    fn record_with_empty_id_counts_as_missing() {
        let refs = refs();
        assert!(resolve_reference("", &refs, true).is_none());
    }

    #[test]
    fn asset_validation_order() {
        let refs = refs();
        assert_eq!(
            resolve_asset("zzz", &refs, true).unwrap_err(),
            ResolveError::NotFound("zzz".to_string())
        );
        let err = resolve_asset("a2", &refs, true).unwrap_err();
        assert_eq!(err, ResolveError::MissingMimeType("a2".to_string()));
        assert_eq!(err.to_string(), "No mimeType found for embed node: a2");

        let no_url = vec![Reference {
            mime_type: Some("video/mp4".to_string()),
            ..Reference::new("v")
        }];
        assert_eq!(
            resolve_asset("v", &no_url, true).unwrap_err(),
            ResolveError::MissingUrl("v".to_string())
        );

        let ok = resolve_asset("a1", &refs, true).unwrap();
        assert_eq!(ok.mime_type, "image/png");
        assert_eq!(ok.url, "https://cdn/a1.png");
    }

    #[test]
    fn merge_reference_overlays_fields_and_drops_remote_id() {
        let attrs = ElementAttrs {
            node_id: Some("legacy-3".to_string()),
            node_type: Some("Asset".to_string()),
            class_name: Some("hero".to_string()),
            ..ElementAttrs::default()
        };
        let reference = Reference::asset("a3", "image/png", "https://cdn/a3.png")
            .with_remote_id("legacy-3")
            .with_field("width", 640)
            .with_field("caption", "A cat");
        let merged = merge_reference(&attrs, &reference);

        assert_eq!(merged.id.as_deref(), Some("a3"));
        assert_eq!(merged.url.as_deref(), Some("https://cdn/a3.png"));
        assert_eq!(merged.mime_type.as_deref(), Some("image/png"));
        assert_eq!(merged.class_name.as_deref(), Some("hero"));
        assert_eq!(merged.width, Some(Dimension::Pixels(640.0)));
        assert_eq!(merged.extra_str("caption"), Some("A cat"));
        assert!(!merged.extra.contains_key("remoteId"));
    }

    #[test]
    fn mistyped_fields_stay_on_the_record() {
        let attrs = ElementAttrs {
            title: Some("from node".to_string()),
            ..ElementAttrs::default()
        };
        let reference = Reference::new("x")
            .with_field("openInNewTab", "yes")
            .with_field("title", serde_json::json!({"en": "Hello"}))
            .with_field("width", 1920.0)
            .with_field("height", 12.5);
        let merged = merge_reference(&attrs, &reference);

        assert_eq!(merged.open_in_new_tab, None);
        assert_eq!(merged.title.as_deref(), Some("from node"));
        assert_eq!(merged.width, Some(Dimension::Pixels(1920.0)));
        assert_eq!(merged.height, Some(Dimension::Pixels(12.5)));
        assert!(!merged.extra.contains_key("title"));
    }
}
