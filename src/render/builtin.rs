//! Built-in leaf renderers and the default registry.
//!
//! These produce plain HTML-shaped views. Callers replace any of them through
//! [`crate::render::RendererOverrides`].

use crate::ast::{ASSET_NODE_TYPE, Dimension};
use crate::config::ClassNameOverrides;
use crate::render::embed::{render_asset, render_embed};
use crate::render::registry::{Registry, Renderer, RendererProps, SharedRenderer, renderer};
use crate::render::{RenderError, RendererKey};
use crate::view::View;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;

/// Characters `encodeURI` leaves alone (besides ASCII alphanumerics).
const URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Percent-encode a URL the way JavaScript's `encodeURI` does.
pub fn encode_uri(url: &str) -> String {
    utf8_percent_encode(url, URI).to_string()
}

/// Resolve the class for `tag`: an override wins outright, otherwise the
/// additional class and the element's own class are joined.
pub fn calculate_class_name(
    tag: &str,
    overrides: &ClassNameOverrides,
    additional_class_name: Option<&str>,
    class_name: Option<&str>,
) -> Option<String> {
    if let Some(overridden) = overrides.get(tag).filter(|c| !c.is_empty()) {
        return Some(overridden.clone());
    }
    match (additional_class_name, class_name) {
        (Some(a), Some(c)) => Some(format!("{a} {c}")),
        (Some(a), None) => Some(a.to_string()),
        (None, c) => c.map(str::to_string),
    }
}

fn css_length(d: &Dimension) -> String {
    match d {
        Dimension::Pixels(px) => format!("{px}px"),
        Dimension::Css(s) => s.clone(),
    }
}

/// Wraps the rendered children in one element.
///
/// The node's `className` feeds the class calculation; `style` and `role`
/// pass through from the node's attributes when present.
#[derive(Debug, Clone)]
pub struct DefaultRenderer {
    pub element: String,
    pub additional_class_name: Option<String>,
}

impl DefaultRenderer {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            additional_class_name: None,
        }
    }

    pub fn with_additional_class_name(mut self, class: impl Into<String>) -> Self {
        self.additional_class_name = Some(class.into());
        self
    }

    pub fn shared(self) -> SharedRenderer {
        Arc::new(self)
    }
}

impl Renderer for DefaultRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        let class = calculate_class_name(
            &self.element,
            props.class_name_overrides(),
            self.additional_class_name.as_deref(),
            props.attrs.class_name.as_deref(),
        );
        let style = props.attrs.extra_str("style").map(str::to_string);
        let role = props.attrs.extra_str("role").map(str::to_string);
        Ok(View::element(&self.element)
            .with_opt_attr("class", class)
            .with_opt_attr("style", style)
            .with_opt_attr("role", role)
            .with_children(props.children))
    }
}

/// `class` elements: a `div` carrying the node's class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassRenderer;

impl Renderer for ClassRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        let class = calculate_class_name(
            "div",
            props.class_name_overrides(),
            None,
            props.attrs.class_name.as_deref(),
        );
        Ok(View::element("div")
            .with_opt_attr("class", class)
            .with_children(props.children))
    }
}

/// Anchors. A link carrying a `nodeType` is an inline embed and is routed to
/// the embed resolver instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkRenderer;

impl Renderer for LinkRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        if props.attrs.node_type.is_some() {
            return render_embed(props, true);
        }

        let attrs = &props.attrs;
        let class = attrs
            .class_name
            .clone()
            .or_else(|| props.class_name_overrides().get("a").cloned());
        let new_tab = attrs.open_in_new_tab.unwrap_or(false);
        let rel = if new_tab {
            Some("noreferrer".to_string())
        } else {
            attrs.rel.clone()
        };
        let target = new_tab.then(|| "_blank".to_string());

        let view = View::element("a")
            .with_opt_attr("class", class)
            .with_opt_attr("href", attrs.href.as_deref().map(encode_uri))
            .with_opt_attr("id", attrs.id.clone())
            .with_opt_attr("rel", rel)
            .with_opt_attr("target", target)
            .with_opt_attr("title", attrs.title.clone());
        Ok(view.with_children(props.children))
    }
}

/// Where a media renderer reads its source URL from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource {
    /// The element's own `src` attribute.
    Src,
    /// The resolved asset's `url` (embed_asset path).
    Url,
}

impl MediaSource {
    fn pick<'p>(self, props: &'p RendererProps<'_>) -> Option<&'p str> {
        match self {
            MediaSource::Src => props.attrs.src.as_deref(),
            MediaSource::Url => props.attrs.url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageRenderer {
    pub source: MediaSource,
}

impl Renderer for ImageRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        let Some(src) = self.source.pick(&props) else {
            return Ok(View::error_marker("[ImageRenderer]: src is required"));
        };
        let attrs = &props.attrs;
        let class = calculate_class_name(
            "img",
            props.class_name_overrides(),
            None,
            attrs.class_name.as_deref(),
        );
        Ok(View::element("img")
            .with_opt_attr("alt", attrs.alt_text.clone())
            .with_opt_attr("class", class)
            .with_opt_attr("height", attrs.height.as_ref().map(ToString::to_string))
            .with_attr("loading", "lazy")
            .with_attr("src", encode_uri(src))
            .with_opt_attr("title", attrs.title.clone())
            .with_opt_attr("width", attrs.width.as_ref().map(ToString::to_string)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VideoRenderer {
    pub source: MediaSource,
}

impl Renderer for VideoRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        let Some(src) = self.source.pick(&props) else {
            return Ok(View::error_marker("[VideoRenderer]: src is required"));
        };
        let attrs = &props.attrs;
        let class = calculate_class_name(
            "video",
            props.class_name_overrides(),
            None,
            attrs.class_name.as_deref(),
        );
        let fallback = View::element("p")
            .with_child(View::text(
                "Your browser doesn't support HTML5 video. Here is a ",
            ))
            .with_child(
                View::element("a")
                    .with_attr("href", src)
                    .with_child(View::text("link to the video")),
            )
            .with_child(View::text(" instead."));
        Ok(View::element("video")
            .with_opt_attr("class", class)
            .with_attr("controls", "")
            .with_attr(
                "height",
                attrs
                    .height
                    .as_ref()
                    .map_or_else(|| "100%".to_string(), ToString::to_string),
            )
            .with_attr("src", encode_uri(src))
            .with_opt_attr("title", attrs.title.clone())
            .with_attr(
                "width",
                attrs
                    .width
                    .as_ref()
                    .map_or_else(|| "100%".to_string(), ToString::to_string),
            )
            .with_child(fallback))
    }
}

/// Audio assets; always reads the resolved `url`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioRenderer;

impl Renderer for AudioRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        let Some(url) = props.attrs.url.as_deref() else {
            return Ok(View::error_marker("[AudioRenderer]: url is required"));
        };
        let class = calculate_class_name(
            "audio",
            props.class_name_overrides(),
            None,
            props.attrs.class_name.as_deref(),
        );
        let fallback = View::element("p")
            .with_child(View::text(
                "Your browser doesn't support HTML5 audio. Here is a ",
            ))
            .with_child(
                View::element("a")
                    .with_attr("href", url)
                    .with_child(View::text("link to the audio")),
            )
            .with_child(View::text(" instead."));
        Ok(View::element("audio")
            .with_opt_attr("class", class)
            .with_attr("controls", "")
            .with_attr("src", encode_uri(url))
            .with_attr("style", "display: block; max-width: 100%; height: auto;")
            .with_child(fallback))
    }
}

const IFRAME_STYLE: &str =
    "position: absolute; top: 0; bottom: 0; right: 0; left: 0; width: 100%; height: 100%;";

/// Responsive iframe: a positioned wrapper `div` around the frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct IFrameRenderer;

impl Renderer for IFrameRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        let attrs = &props.attrs;
        let Some(url) = attrs.url.as_deref() else {
            return Ok(View::nothing());
        };
        let class = calculate_class_name(
            "iframe",
            props.class_name_overrides(),
            None,
            attrs.class_name.as_deref(),
        );

        // a wrapper class takes over sizing; otherwise keep a 16:9 box.
        let wrapper_style = class.is_none().then(|| {
            let width = attrs
                .width
                .as_ref()
                .map_or_else(|| "100%".to_string(), css_length);
            let mut style = format!("position: relative; overflow: hidden; width: {width};");
            match &attrs.height {
                Some(h) => style.push_str(&format!(" height: {};", css_length(h))),
                None => style.push_str(" padding-top: 56.25%;"),
            }
            style
        });

        let frame = View::element("iframe")
            .with_attr("allow", "fullscreen")
            .with_attr("frameborder", "0")
            .with_attr("loading", "lazy")
            .with_attr("referrerpolicy", "no-referrer")
            .with_attr("src", encode_uri(url))
            .with_attr("style", IFRAME_STYLE)
            .with_attr("title", attrs.title.as_deref().unwrap_or(url));

        Ok(View::element("div")
            .with_opt_attr("class", class)
            .with_opt_attr("style", wrapper_style)
            .with_child(frame))
    }
}

/// Routes `embed` elements: assets by mimeType, everything else by nodeType.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbedRenderer;

impl Renderer for EmbedRenderer {
    fn render(&self, props: RendererProps<'_>) -> Result<View, RenderError> {
        if props.attrs.node_type.as_deref() == Some(ASSET_NODE_TYPE) {
            render_asset(props)
        } else {
            render_embed(props, false)
        }
    }
}

/// The built-in registry every render layers its overrides onto.
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::empty();

    for key in RendererKey::ALL {
        if let Some(tag) = key.default_tag() {
            registry.insert(key, DefaultRenderer::new(tag).shared());
        }
    }

    registry.insert(RendererKey::Class, Arc::new(ClassRenderer));
    registry.insert(RendererKey::A, Arc::new(LinkRenderer));
    registry.insert(
        RendererKey::Img,
        Arc::new(ImageRenderer {
            source: MediaSource::Src,
        }),
    );
    registry.insert(RendererKey::Iframe, Arc::new(IFrameRenderer));
    registry.insert(
        RendererKey::Video,
        Arc::new(VideoRenderer {
            source: MediaSource::Src,
        }),
    );
    registry.insert(
        RendererKey::ListItemChild,
        renderer(|props| Ok(props.children_fragment())),
    );
    registry.insert(RendererKey::Embed, Arc::new(EmbedRenderer));

    registry.insert_asset("audio", Arc::new(AudioRenderer));
    registry.insert_asset(
        "image",
        Arc::new(ImageRenderer {
            source: MediaSource::Url,
        }),
    );
    registry.insert_asset(
        "video",
        Arc::new(VideoRenderer {
            source: MediaSource::Url,
        }),
    );

    registry
}
