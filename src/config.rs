//! Data-only render configuration, loadable from YAML or JSON.
//!
//! Configuration comes in layers (built-in default, project, call). Maps are
//! merged key-wise, later layers winning per key; scalars take the last layer
//! that sets them.

use crate::render::RendererKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-key boolean switches (`disabled_elements`, `remove_empty_elements`).
pub type ElementTypeMap = BTreeMap<RendererKey, bool>;

/// Class names keyed by HTML tag name (`p`, `h1`, `img`, `div`, ...).
pub type ClassNameOverrides = BTreeMap<String, String>;

/// One configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Class of the root container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub disabled_elements: ElementTypeMap,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub remove_empty_elements: ElementTypeMap,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub class_name_overrides: ClassNameOverrides,

    /// Class stamped on every `p`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_paragraph_class_name: Option<String>,

    /// Class stamped on every heading level. Falls back to the paragraph class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_heading_class_name: Option<String>,

    /// Run the cleanup pass before rendering (default `true`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<bool>,

    /// Also match embed `nodeId`s against reference `remoteId`s (default `true`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_remote_id: Option<bool>,
}

/// Keys removed when empty unless a layer says otherwise.
pub fn default_remove_empty() -> ElementTypeMap {
    [
        RendererKey::H1,
        RendererKey::H2,
        RendererKey::H3,
        RendererKey::H4,
        RendererKey::H5,
        RendererKey::H6,
        RendererKey::TableHead,
        RendererKey::TableRow,
    ]
    .into_iter()
    .map(|k| (k, true))
    .collect()
}

impl RenderConfig {
    /// Load a layer from a `.yaml`/`.yml` or `.json` file.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let config = if is_json {
            serde_json::from_str(&text)?
        } else {
            serde_yaml::from_str(&text)?
        };
        Ok(config)
    }

    /// Merge layers in increasing precedence.
    pub fn layered(layers: &[&RenderConfig]) -> RenderConfig {
        let mut out = RenderConfig::default();
        for layer in layers {
            out.disabled_elements
                .extend(layer.disabled_elements.iter().map(|(k, v)| (*k, *v)));
            out.remove_empty_elements
                .extend(layer.remove_empty_elements.iter().map(|(k, v)| (*k, *v)));
            out.class_name_overrides.extend(
                layer
                    .class_name_overrides
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
            if layer.class_name.is_some() {
                out.class_name = layer.class_name.clone();
            }
            if layer.fixed_paragraph_class_name.is_some() {
                out.fixed_paragraph_class_name = layer.fixed_paragraph_class_name.clone();
            }
            if layer.fixed_heading_class_name.is_some() {
                out.fixed_heading_class_name = layer.fixed_heading_class_name.clone();
            }
            if layer.cleanup.is_some() {
                out.cleanup = layer.cleanup;
            }
            if layer.match_remote_id.is_some() {
                out.match_remote_id = layer.match_remote_id;
            }
        }
        out
    }

    /// The merged remove-empty set: built-in default under this layer.
    pub fn effective_remove_empty(&self) -> ElementTypeMap {
        let mut out = default_remove_empty();
        out.extend(self.remove_empty_elements.iter().map(|(k, v)| (*k, *v)));
        out
    }

    /// Class overrides with the fixed heading/paragraph classes expanded.
    ///
    /// The fixed classes sit *below* explicit per-tag overrides.
    pub fn effective_class_name_overrides(&self) -> ClassNameOverrides {
        let mut out = ClassNameOverrides::new();

        let heading = self
            .fixed_heading_class_name
            .as_ref()
            .or(self.fixed_paragraph_class_name.as_ref());
        if let Some(heading) = heading {
            for key in RendererKey::HEADINGS {
                out.insert(key.as_str().to_string(), heading.clone());
            }
        }
        if let Some(paragraph) = &self.fixed_paragraph_class_name {
            out.insert("p".to_string(), paragraph.clone());
        }

        out.extend(
            self.class_name_overrides
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        out
    }
}
