//! rtfview - render rich-text content trees to HTML

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use rtfview::config::RenderConfig;
use rtfview::render::{RenderOptions, RendererKey, RichTextRenderer};

#[derive(Parser)]
#[command(name = "rtfview")]
#[command(version, about = "Render rich-text content trees to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    rtfview render post.json                     Render one document to stdout
    rtfview render post.json --references r.json Resolve embeds against r.json
    rtfview render-all content/ site/            Render every .json under content/")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one document and print the result
    Render(RenderArgs),

    /// Render every .json document under a directory
    RenderAll(RenderAllArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Content JSON or rich-text field JSON
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// JSON array of reference records
    #[arg(long, value_name = "FILE")]
    references: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,
}

#[derive(clap::Args)]
struct RenderAllArgs {
    #[arg(value_name = "IN_DIR")]
    in_dir: PathBuf,

    #[arg(value_name = "OUT_DIR")]
    out_dir: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Project configuration (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable a renderer key (repeatable)
    #[arg(long = "disable", value_name = "KEY")]
    disable: Vec<RendererKey>,

    /// Drop empty elements for a renderer key (repeatable)
    #[arg(long = "remove-empty", value_name = "KEY")]
    remove_empty: Vec<RendererKey>,

    /// Class of the root container
    #[arg(long, value_name = "NAME")]
    class_name: Option<String>,

    /// Class stamped on every paragraph
    #[arg(long, value_name = "NAME")]
    paragraph_class: Option<String>,

    /// Class stamped on every heading
    #[arg(long, value_name = "NAME")]
    heading_class: Option<String>,

    /// Skip the cleanup pass
    #[arg(long)]
    no_cleanup: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Render(args) => render(args),
        Commands::RenderAll(args) => render_all(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Project layer from `--config`; call layer from the flags.
fn renderer_and_options(args: &ConfigArgs) -> rtfview::Result<(RichTextRenderer, RenderOptions)> {
    let project = match &args.config {
        Some(path) => RenderConfig::from_path(path)?,
        None => RenderConfig::default(),
    };

    let call = RenderConfig {
        class_name: args.class_name.clone(),
        disabled_elements: args.disable.iter().map(|k| (*k, true)).collect(),
        remove_empty_elements: args.remove_empty.iter().map(|k| (*k, true)).collect(),
        fixed_paragraph_class_name: args.paragraph_class.clone(),
        fixed_heading_class_name: args.heading_class.clone(),
        cleanup: args.no_cleanup.then_some(false),
        ..RenderConfig::default()
    };

    let renderer = RichTextRenderer::new().with_project_config(project);
    let options = RenderOptions {
        config: call,
        ..RenderOptions::default()
    };
    Ok((renderer, options))
}

fn render(args: &RenderArgs) -> rtfview::Result<()> {
    let (renderer, options) = renderer_and_options(&args.config)?;
    let prepared = renderer.prepare(&options);
    let output = rtfview::render_file(&args.input, args.references.as_deref(), &prepared)?;

    for diagnostic in &output.diagnostics {
        eprintln!("{}: {diagnostic}", args.input.display());
    }

    match args.format {
        Format::Html => println!("{}", output.to_html()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&output.view)?),
    }
    Ok(())
}

fn render_all(args: &RenderAllArgs) -> rtfview::Result<()> {
    let (renderer, options) = renderer_and_options(&args.config)?;
    let prepared = renderer.prepare(&options);
    rtfview::render_all_in_dirs(&args.in_dir, &args.out_dir, &prepared)?;
    Ok(())
}
