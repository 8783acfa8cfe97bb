use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use fieldposter::{
    BackendKind, DEFAULT_SEED, FontBook, FontRole, OutputFormat, PosterConfig, PosterKind,
    RenderBackend as _, RenderSettings,
};

/// Environment variable naming a font directory when `--font-dir` is absent.
const FONT_DIR_ENV: &str = "FIELDPOSTER_FONT_DIR";

#[derive(Parser, Debug)]
#[command(name = "fieldposter", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster to PNG or SVG.
    Render(RenderArgs),
    /// List available posters.
    List,
    /// Sample a poster's field without rendering and print statistics as JSON.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Poster to render (see `list`).
    #[arg(long)]
    poster: PosterKind,

    /// Output path; `.png` or `.svg` unless `--format` is given.
    #[arg(long)]
    out: PathBuf,

    /// Output format. Inferred from the `--out` extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// Generator seed. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON overrides (sources, falloff, acceptance, trace, fonts).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory searched for font files. Falls back to `FIELDPOSTER_FONT_DIR`.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Uniform output scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Rasterizer used for PNG output.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,

    /// Print diagnostics about font resolution (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Poster whose field recipe is the starting point.
    #[arg(long, default_value = "gravitational-recall")]
    poster: PosterKind,

    /// JSON overrides merged over the poster's recipe.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generator seed. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Svg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    /// `vello_cpu` with `parley` text.
    Cpu,
    /// SVG writer rasterized by `resvg`.
    Svg,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::List => cmd_list(),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<PosterConfig> {
    match path {
        Some(p) => PosterConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(PosterConfig::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let opts = cfg
        .poster_options(args.poster, args.seed)
        .with_context(|| format!("configure poster '{}'", args.poster))?;

    let font_dir = args
        .font_dir
        .clone()
        .or_else(|| std::env::var_os(FONT_DIR_ENV).map(PathBuf::from));
    let mut fonts = cfg.font_book(font_dir);
    if args.dump_fonts {
        dump_font_diagnostics(&mut fonts);
    }

    let format = match args.format {
        Some(FormatChoice::Png) => OutputFormat::Png,
        Some(FormatChoice::Svg) => OutputFormat::Svg,
        None => OutputFormat::from_path(&args.out)?,
    };
    let settings = RenderSettings { scale: args.scale };

    let scene = fieldposter::build_poster(args.poster, &opts)
        .with_context(|| format!("build poster '{}'", args.poster))?;

    match (format, args.backend) {
        (OutputFormat::Png, BackendChoice::Svg) => {
            let mut backend =
                fieldposter::create_backend(BackendKind::SvgRaster, settings, &mut fonts);
            let frame = backend.render_scene(&scene)?;
            fieldposter::write_png(&frame, &args.out)
                .with_context(|| format!("write png '{}'", args.out.display()))?;
        }
        _ => {
            fieldposter::write_output(&scene, &args.out, format, settings, &mut fonts)
                .with_context(|| format!("write '{}'", args.out.display()))?;
        }
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_list() -> anyhow::Result<()> {
    for kind in PosterKind::ALL {
        let field = if kind.field_recipe().is_some() {
            "  [field]"
        } else {
            ""
        };
        println!("{:<30} {}{field}", kind.as_str(), kind.description());
    }
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let base = args
        .poster
        .field_recipe()
        .with_context(|| format!("poster '{}' has no field to sample", args.poster))?;
    let recipe = cfg.field_recipe(&base).context("merge field overrides")?;
    let seed = cfg.seed_or(args.seed).unwrap_or(DEFAULT_SEED);

    let run = recipe.run(seed)?;
    let stats = run.stats(&recipe);
    let json = serde_json::to_string_pretty(&stats).context("serialize field stats")?;
    println!("{json}");
    Ok(())
}

fn dump_font_diagnostics(fonts: &mut FontBook) {
    eprintln!("text font diagnostics:");
    for role in FontRole::ALL {
        eprintln!("  {role:?}:");
        match fonts.resolve(role) {
            Some(font) => {
                eprintln!("    origin:      {:?}", font.origin);
                eprintln!("    family:      {}", font.family);
                eprintln!("    sha256:      {}", font.sha256_hex());
            }
            None => eprintln!("    unresolved (text in this role is skipped)"),
        }
    }
}
