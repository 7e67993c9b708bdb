use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const POST: &str = r#"[
  {"type": "heading-one", "children": [{"text": "Title"}]},
  {"type": "paragraph", "children": [{"text": "Hello   World!", "bold": true}]},
  {"type": "embed", "nodeId": "cat", "nodeType": "Asset", "children": [{"text": ""}]}
]"#;

const REFERENCES: &str = r#"[
  {"id": "cat", "mimeType": "image/jpeg", "url": "https://cdn.example.com/cat.jpg", "altText": "A cat"}
]"#;

#[test]
fn renders_content_with_references() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("post.json");
    let refs = dir.path().join("refs.json");
    fs::write(&input, POST).unwrap();
    fs::write(&refs, REFERENCES).unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render").arg(&input).arg("--references").arg(&refs);

    // println! adds a trailing newline.
    cmd.assert().success().stdout(predicate::eq(
        "<div><h1>Title</h1><p><b>Hello World!</b></p>\
         <img alt=\"A cat\" loading=\"lazy\" src=\"https://cdn.example.com/cat.jpg\"></div>\n",
    ));
}

#[test]
fn missing_reference_is_reported_on_stderr_but_succeeds() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("post.json");
    fs::write(&input, POST).unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render").arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "[RenderAsset]: No id found for embed node: cat",
        ))
        .stderr(predicate::str::contains("warning[reference.not_found]"));
}

#[test]
fn rich_text_field_carries_its_own_references() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("field.json");
    let field = format!(r#"{{"json": {{"children": {POST}}}, "references": {REFERENCES}}}"#);
    fs::write(&input, field).unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render").arg(&input).arg("--class-name").arg("rich-text");

    cmd.assert().success().stdout(
        predicate::str::starts_with(r#"<div class="rich-text">"#)
            .and(predicate::str::contains(r#"src="https://cdn.example.com/cat.jpg""#))
            .and(predicate::str::contains("No id found").not()),
    );
}

#[test]
fn flags_and_config_file_layer() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("post.json");
    let config = dir.path().join("rtfview.yaml");
    fs::write(&input, POST).unwrap();
    fs::write(
        &config,
        "class_name_overrides:\n  h1: from-config\n  p: from-config\nfixed_paragraph_class_name: ignored\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--disable")
        .arg("embed")
        .arg("--paragraph-class")
        .arg("lead");

    cmd.assert().success().stdout(predicate::eq(
        "<div><h1 class=\"from-config\">Title</h1><p class=\"from-config\"><b>Hello World!</b></p></div>\n",
    ));
}

#[test]
fn json_format_prints_the_view_tree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("post.json");
    fs::write(&input, r#"[{"type": "paragraph", "children": [{"text": "x"}]}]"#).unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render").arg(&input).arg("--format").arg("json");

    cmd.assert().success().stdout(
        predicate::str::contains(r#""kind": "element""#)
            .and(predicate::str::contains(r#""tag": "p""#))
            .and(predicate::str::contains(r#""value": "x""#)),
    );
}

#[test]
fn unknown_renderer_key_is_a_usage_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("post.json");
    fs::write(&input, POST).unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render").arg(&input).arg("--disable").arg("marquee");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown renderer key: marquee"));
}

#[test]
fn invalid_json_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "{not json").unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render").arg(&input);

    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("error: invalid JSON"));
}

#[test]
fn render_all_mirrors_the_tree() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("content");
    let out_dir = dir.path().join("site");
    fs::create_dir_all(in_dir.join("blog")).unwrap();
    fs::write(in_dir.join("index.json"), POST).unwrap();
    fs::write(
        in_dir.join("blog").join("first.json"),
        r#"{"text": "plain text post"}"#,
    )
    .unwrap();
    fs::write(in_dir.join("notes.txt"), "not a document").unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render-all").arg(&in_dir).arg(&out_dir);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Done. Rendered 2 files"));

    let index = fs::read_to_string(out_dir.join("index.html")).unwrap();
    assert!(index.starts_with("<div><h1>Title</h1>"), "{index}");

    let first = fs::read_to_string(out_dir.join("blog").join("first.html")).unwrap();
    assert_eq!(first, "<div><p>plain text post</p></div>");

    assert!(!out_dir.join("notes.html").exists());
}

#[cfg(unix)]
#[test]
fn render_all_fails_on_a_symlink_cycle() {
    let dir = tempdir().unwrap();
    let in_dir = dir.path().join("content");
    fs::create_dir_all(&in_dir).unwrap();
    fs::write(in_dir.join("index.json"), POST).unwrap();
    std::os::unix::fs::symlink(&in_dir, in_dir.join("again")).unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render-all").arg(&in_dir).arg(dir.path().join("out"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error: directory walk failed"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn render_all_requires_the_source_directory() {
    let dir = tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("rtfview");
    cmd.arg("render-all")
        .arg(dir.path().join("nope"))
        .arg(dir.path().join("out"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("source directory not found"));
}
