use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use astronomicon::log::init_logging;
use astronomicon::{Astronomicon, BodyKind, BodyRef, Config};

#[derive(Parser)]
#[command(name = "astronomicon")]
#[command(about = "Browse a catalog of stars, planets and galaxies")]
struct Cli {
    /// Record file to use instead of the configured one
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Star,
    Planet,
    Galaxy,
}

impl From<KindArg> for BodyKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Star => BodyKind::Star,
            KindArg::Planet => BodyKind::Planet,
            KindArg::Galaxy => BodyKind::Galaxy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List names, stars first, then planets, then galaxies
    List {
        /// Only list this kind
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Print the full description of one object
    View {
        name: String,
        /// Only look among this kind
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Print derived facts about one object
    Facts {
        name: String,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Find objects whose name contains a term
    Search { term: String },
    /// Dump the catalog as JSON
    Export,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    init_logging(&config.log_filter);

    let data_file = cli.data_file.unwrap_or(config.data_file);
    let astronomicon = Astronomicon::open(data_file);

    match cli.command {
        Commands::List { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind.into()],
                None => BodyKind::ALL.to_vec(),
            };
            for kind in kinds {
                for body in astronomicon.list(kind) {
                    println!("{:<8}{}", kind.to_string(), body.name());
                }
            }
        }
        Commands::View { name, kind } => {
            let body = lookup(&astronomicon, &name, kind)?;
            println!("{}", body.summary());
        }
        Commands::Facts { name, kind } => {
            let body = lookup(&astronomicon, &name, kind)?;
            println!("{}", body.facts_text()?);
        }
        Commands::Search { term } => {
            let found = astronomicon.search(&term);
            if found.is_empty() {
                println!("Nothing matches \"{}\".", term.trim());
            }
            for body in found {
                println!("{:<8}{}", body.kind().to_string(), body.name());
            }
        }
        Commands::Export => {
            println!("{}", astronomicon.to_json()?);
        }
    }

    Ok(())
}

fn lookup<'a>(
    astronomicon: &'a Astronomicon,
    name: &str,
    kind: Option<KindArg>,
) -> anyhow::Result<BodyRef<'a>> {
    let found = match kind {
        Some(kind) => astronomicon.find_by_name(name, kind.into()),
        None => astronomicon.find_any(name),
    };
    found.with_context(|| format!("no celestial object named \"{}\"", name.trim()))
}
