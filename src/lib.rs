pub mod ast;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod render;
pub mod table;
pub mod view;

pub use error::{Error, Result};

use ast::{Content, Reference, RichTextField};
use render::{PreparedRender, RenderOutput};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// A document on disk: bare content, or a whole rich-text field carrying its
/// own references.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InputDocument {
    Content(Content),
    Field(RichTextField),
}

impl InputDocument {
    /// Split into the tree to render and the references that ship with it.
    pub fn into_parts(self) -> Option<(Content, Vec<Reference>)> {
        match self {
            InputDocument::Content(content) => Some((content, Vec::new())),
            InputDocument::Field(field) => {
                let nodes = field.content()?;
                Some((Content::Nodes(nodes), field.references))
            }
        }
    }
}

pub fn load_document(path: &Path) -> Result<(Content, Vec<Reference>)> {
    let text = fs::read_to_string(path)?;
    let doc: InputDocument = serde_json::from_str(&text)?;
    doc.into_parts()
        .ok_or_else(|| Error::NoContent(path.to_path_buf()))
}

/// Read a reference list (a JSON array of records).
pub fn load_references(path: &Path) -> Result<Vec<Reference>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Single file mode: load `input`, append any extra references, render.
///
/// References embedded in a rich-text field come first, so they win when an
/// id appears in both.
pub fn render_file(
    input: &Path,
    extra_references: Option<&Path>,
    prepared: &PreparedRender,
) -> Result<RenderOutput> {
    let (content, mut references) = load_document(input)?;
    if let Some(path) = extra_references {
        references.extend(load_references(path)?);
    }
    Ok(prepared.render(&content, &references)?)
}

/// Bulk mode: walk `in_root` for `.json` documents and write mirrored `.html`
/// files under `out_root`. Returns the number of files written.
///
/// Walk failures (unreadable directories, symlink cycles) abort the run
/// before anything is written.
pub fn render_all_in_dirs(
    in_root: &Path,
    out_root: &Path,
    prepared: &PreparedRender,
) -> Result<usize> {
    let start_time = Instant::now();

    if !in_root.exists() {
        return Err(Error::MissingDirectory(in_root.to_path_buf()));
    }

    // symlinked content directories are followed; a link cycle is an error.
    let mut entries = Vec::new();
    for entry in WalkDir::new(in_root).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            entries.push(entry);
        }
    }

    entries.sort_by(|a, b| a.path().cmp(b.path()));

    let total = entries.len();
    let mut count = 0;

    for entry in entries {
        let path = entry.path();
        let out_path = mirrored_path(in_root, out_root, path)?;

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let output = render_file(path, None, prepared)?;
        for diagnostic in &output.diagnostics {
            eprintln!("{}: {diagnostic}", path.display());
        }
        fs::write(&out_path, output.to_html())?;

        count += 1;

        let total_ms = start_time.elapsed().as_millis();
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        eprintln!(
            "[{:>4}/{:>4}] [{:02}:{:02}.{:03}] Rendered: {:?}",
            count, total, mins, secs, ms, out_path
        );
    }

    let total_secs = start_time.elapsed().as_secs_f64();
    let avg_str = if count > 0 {
        format!("{:.3}s", total_secs / count as f64)
    } else {
        "-".to_string()
    };
    eprintln!(
        "Done. Rendered {} files in {:.3}s (avg {}/doc).",
        count, total_secs, avg_str
    );
    Ok(count)
}

fn mirrored_path(in_root: &Path, out_root: &Path, path: &Path) -> Result<PathBuf> {
    let relative = path.strip_prefix(in_root)?;
    let mut out = out_root.join(relative);
    out.set_extension("html");
    Ok(out)
}
