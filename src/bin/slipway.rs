use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use slipway::{Document, NavOutcome, PresentationSession, SessionOpts, StepPath};

#[derive(Parser, Debug)]
#[command(name = "slipway", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a presentation document and report every problem found.
    Validate(InArgs),
    /// Print the table of contents.
    Toc(TocArgs),
    /// Step through the presentation from the start, one line per step.
    Walk(WalkArgs),
    /// Jump to a step path and print where the camera ends up.
    Goto(GotoArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input presentation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct TocArgs {
    /// Input presentation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print JSON instead of an indented outline.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct WalkArgs {
    /// Input presentation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Stop after this many steps.
    #[arg(long)]
    max_steps: Option<usize>,
}

#[derive(Parser, Debug)]
struct GotoArgs {
    /// Input presentation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Comma-separated step path, e.g. `2,0,1`.
    #[arg(long)]
    path: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Toc(args) => cmd_toc(args),
        Command::Walk(args) => cmd_walk(args),
        Command::Goto(args) => cmd_goto(args),
    }
}

fn load(path: &std::path::Path) -> anyhow::Result<Document> {
    Document::from_path(path).with_context(|| format!("load presentation '{}'", path.display()))
}

fn open(path: &std::path::Path) -> anyhow::Result<PresentationSession> {
    let doc = load(path)?;
    PresentationSession::new(&doc, SessionOpts::default())
        .with_context(|| format!("compile presentation '{}'", path.display()))
}

fn cmd_validate(args: InArgs) -> anyhow::Result<()> {
    let doc = load(&args.in_path)?;
    doc.validate()
        .with_context(|| format!("validate '{}'", args.in_path.display()))?;
    let sess = PresentationSession::new(&doc, SessionOpts::default())?;
    println!(
        "ok: {} frames, {} nodes",
        sess.frames().len(),
        sess.scene().len()
    );
    Ok(())
}

fn cmd_toc(args: TocArgs) -> anyhow::Result<()> {
    let sess = open(&args.in_path)?;
    let toc = sess.toc();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&toc).context("serialize table of contents")?
        );
    } else {
        print!("{toc}");
    }
    Ok(())
}

fn cmd_walk(args: WalkArgs) -> anyhow::Result<()> {
    let mut sess = open(&args.in_path)?;
    sess.start()?;
    print_step(&sess);
    let mut taken = 0;
    while args.max_steps.is_none_or(|max| taken < max) {
        if sess.next()? == NavOutcome::Unchanged {
            break;
        }
        taken += 1;
        print_step(&sess);
    }
    Ok(())
}

fn cmd_goto(args: GotoArgs) -> anyhow::Result<()> {
    let target = StepPath::parse(&args.path).context("parse --path")?;
    let mut sess = open(&args.in_path)?;
    sess.go_to_state(&target)?;
    print_step(&sess);
    println!(
        "{}",
        serde_json::to_string(&sess.camera().target).context("serialize camera")?
    );
    Ok(())
}

fn print_step(sess: &PresentationSession) {
    let cam = sess.camera().target;
    println!(
        "{}\t{}\tx={:.4} y={:.4} scale={:.4}\t{}",
        sess.path(),
        sess.counter_label(),
        cam.x,
        cam.y,
        cam.scale,
        sess.fingerprint()
    );
}
