use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod extract;

#[derive(Parser)]
#[command(
    name = "meta_extract",
    about = "Extract station-group metadata from geothermal scenario runs"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build `meta_geners_<scenario>.json` for every configured scenario.
    Extract {
        #[arg(long, default_value = "settings.json")]
        settings: PathBuf,
        /// Overrides `output_dir` from the settings file.
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Build simulations of a scenario on the rayon pool.
        #[arg(long)]
        parallel: bool,
    },
    /// Copy each scenario's spec to `meta_spec_<scenario>.json`.
    CopySpec {
        #[arg(long, default_value = "settings.json")]
        settings: PathBuf,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn output_dir(settings: &meta_world::Settings, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| settings.output_dir.clone())
}

fn load(path: &Path) -> Result<meta_world::Settings> {
    let settings = meta_world::load_settings(path)?;
    tracing::debug!(
        path = %path.display(),
        scenarios = settings.dir_to_extract.len(),
        aliases = settings.gener_alias.len(),
        groupings = settings.custom_grouping.len(),
        "loaded settings"
    );
    Ok(settings)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            settings,
            output_dir: dir_flag,
            parallel,
        } => {
            let settings = load(&settings)?;
            let options = extract::ExtractOptions {
                output_dir: output_dir(&settings, dir_flag),
                parallel,
            };
            let written = extract::run_extract(&settings, &options)?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Commands::CopySpec {
            settings,
            output_dir: dir_flag,
        } => {
            let settings = load(&settings)?;
            let target = output_dir(&settings, dir_flag);
            for path in extract::run_copy_spec(&settings, &target)? {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}
