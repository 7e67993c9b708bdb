use std::fs;
use std::path::PathBuf;
use rtfview::render::{RenderOptions, RichTextRenderer};

fn base_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
}

#[test]
fn test_article_with_asset() {
    let in_path = base_dir().join("001-in-article.json");
    let refs_path = base_dir().join("001-refs-article.json");
    let want_path = base_dir().join("001-want-article.html");

    let want_html = fs::read_to_string(&want_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", want_path.display()));

    let prepared = RichTextRenderer::new().prepare(&RenderOptions::default());
    let output = rtfview::render_file(&in_path, Some(&refs_path), &prepared)
        .unwrap_or_else(|e| panic!("failed to render {}: {e}", in_path.display()));
    let actual_html = output.to_html();

    // leave the actual output next to the fixture when it drifts, for diffing.
    let out_path = base_dir().join("001-out-article.html");
    if !actual_html.eq(&want_html) {
        fs::write(&out_path, &actual_html)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", out_path.display()));
    } else if out_path.exists() {
        fs::remove_file(&out_path)
            .unwrap_or_else(|e| panic!("failed to remove {}: {e}", out_path.display()));
    }

    assert_eq!(actual_html, want_html);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}
