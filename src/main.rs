use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser};

use glocal_orchestrator::config::init_default_config;
use glocal_orchestrator::pipeline::{GlocalPipeline, PipelineConfig};
use glocal_orchestrator::progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "glocal-orchestrator")]
#[command(about = "Content glocalization pipeline (segmentation, translation, adaptation, compliance)", long_about = None)]
struct Args {
    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long)]
    force: bool,

    /// Input source content (plain text)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output hand-off JSON (default: <input_stem>_handoff.json)
    #[arg(short, long, value_name = "JSON")]
    output: Option<PathBuf>,

    /// Config file path (default: search for glocal-orchestrator.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project name (default: input file stem)
    #[arg(long)]
    project_name: Option<String>,

    /// Project context line, e.g. "HIV/AIDS · DE"
    #[arg(long)]
    context: Option<String>,

    /// Asset type (email, webpage, brochure, presentation, social)
    #[arg(long)]
    asset_type: Option<String>,

    /// Source language tag (e.g. EN)
    #[arg(long)]
    source_lang: Option<String>,

    /// Target language tag (e.g. DE, JA); default derived from context
    #[arg(long)]
    target_lang: Option<String>,

    /// Run without webhook/store traffic (local segmentation + mock analysis)
    #[arg(long)]
    offline: bool,

    /// Process at most N segments (dev-only)
    #[arg(long)]
    max_segments: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let progress = ConsoleProgress::new(true);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let input = match args.input {
        Some(p) => p,
        None => {
            let mut cmd = Args::command();
            cmd.print_help().context("print help")?;
            eprintln!(
                "\n\nUSAGE:\n  glocal-orchestrator <input.txt>\n\nTIPS:\n  - The hand-off JSON lands next to the input unless -o is given.\n  - Default config search: glocal-orchestrator.toml (upwards), or set GLOCAL_ORCHESTRATOR_CONFIG.\n  - Use --offline to run without the webhook services.\n"
            );
            return Ok(());
        }
    };
    let output = match args.output {
        Some(p) => p,
        None => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output")
                .to_string();
            input.with_file_name(format!("{stem}_handoff.json"))
        }
    };

    let cfg = PipelineConfig::from_paths_and_args(
        &input,
        &output,
        args.config,
        args.project_name,
        args.context,
        args.asset_type,
        args.source_lang,
        args.target_lang,
        args.offline,
        args.max_segments,
    )
    .context("build config")?;

    let mut pipeline = GlocalPipeline::new(cfg, progress)?;
    pipeline.run(&input, &output)?;
    Ok(())
}
