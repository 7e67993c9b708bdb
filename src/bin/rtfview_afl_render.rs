//! AFL++ fuzz target for `rtfview`.
//!
//! Stdin-driven so it can be used with AFL++. Build and run it via
//! `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin rtfview_afl_render
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/rtfview_afl_render
//! ```
//!
//! AFL++ only treats signals/aborts as crashes, so any unwind is turned into
//! `abort()`.

use std::io::Read;

use rtfview::InputDocument;
use rtfview::ast::Reference;
use rtfview::cleanup::cleanup_nodes;
use rtfview::render::{RenderOptions, RichTextRenderer};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN {
        return;
    }

    // most inputs will not be JSON at all; those are uninteresting but must not panic.
    let Ok(doc) = serde_json::from_slice::<InputDocument>(data) else {
        return;
    };
    let Some((content, mut references)) = doc.into_parts() else {
        return;
    };

    // give half the embeds something to resolve against.
    references.push(Reference::asset("fuzz-image", "image/png", "https://fuzz/x.png"));
    references.push(Reference::asset("fuzz-video", "video/mp4", "https://fuzz/x.mp4"));

    // invariants that must hold for any parsed tree:
    // - cleanup is idempotent
    // - rendering never panics, with or without cleanup
    let once = cleanup_nodes(content.elements());
    let twice = cleanup_nodes(&once);
    assert_eq!(once, twice, "cleanup is not idempotent");

    let prepared = RichTextRenderer::new().prepare(&RenderOptions::default());
    if let Ok(out) = prepared.render(&content, &references) {
        let _html = out.to_html();
        let _json = serde_json::to_vec(&out.view).unwrap();
    }
    let _ = prepared.render_nodes(content.elements(), &references);
}

fn main() {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data).unwrap();

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}
