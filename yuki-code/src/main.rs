//! Build the Yuki Code font.
//!
//! With no arguments, reads the resources under the current directory and
//! writes `output/YukiCode-Regular.ttf`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use yuki_code::{build, BuildConfig, Error, Preset};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// A TOML build config. Relative paths in it are resolved against its directory.
    #[arg(short, long, conflicts_with = "root")]
    config: Option<PathBuf>,

    /// The directory holding `resources/`, if not the current one
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// The output font file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ligature placement
    #[arg(short, long, value_enum)]
    profile: Option<ProfileArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    /// Offsets derived from the grid
    Grid,
    /// Offsets tuned for Fira Code
    Calibrated,
}

impl From<ProfileArg> for Preset {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Grid => Preset::Grid,
            ProfileArg::Calibrated => Preset::Calibrated,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut config = match (&args.config, &args.root) {
        (Some(path), _) => BuildConfig::load(path)?,
        (None, Some(root)) => BuildConfig::with_root(root),
        (None, None) => BuildConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(profile) = args.profile {
        config.profile.preset = profile.into();
    }

    let output = build(&config)?;
    if !output.warnings.is_empty() {
        log::warn!("{} glyphs or ligatures were skipped", output.warnings.len());
    }
    log::info!(
        "Wrote {} ({} glyphs, {} ligatures)",
        output.path.display(),
        output.glyph_count,
        output.substitution_count
    );
    Ok(())
}
