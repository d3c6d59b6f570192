use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "subpass", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a scene into a PNG.
    Frame(FrameArgs),
    /// Print the strategy chosen for every subpass without rendering.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print compositor counters after rendering.
    #[arg(long)]
    stats: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn read_scene(path: &std::path::Path) -> anyhow::Result<subpass::Scene> {
    let scene = subpass::Scene::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    scene.validate()?;
    Ok(scene)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;
    let (frame, stats) = subpass::render_scene(&scene, &subpass::CompositorOpts::default())?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    if args.stats {
        eprintln!(
            "elided={} collapsed={} offscreen={} filtered={} skipped_empty={} backdrops={} max_depth={}",
            stats.elided,
            stats.collapsed,
            stats.offscreen,
            stats.filtered,
            stats.skipped_empty,
            stats.backdrops,
            stats.max_depth
        );
        eprintln!("checksum={:016x}", frame.checksum());
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;
    let root = scene.build()?;
    let plan = subpass::plan_pass_tree(&root, scene.canvas)?;

    for decision in plan {
        let path = decision
            .path
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(".");
        let label = decision.label.as_deref().unwrap_or("-");
        match decision.coverage {
            Some(c) => println!(
                "{path}\t{label}\t{}\tdepth={}\t{}x{}+{}+{}",
                decision.strategy, decision.depth, c.width, c.height, c.x, c.y
            ),
            None => println!(
                "{path}\t{label}\t{}\tdepth={}",
                decision.strategy, decision.depth
            ),
        }
    }
    Ok(())
}
