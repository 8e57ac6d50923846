//! CLI frontend for the Scaffold level compiler.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sf",
    about = "Scaffold: compile block-world levels into worlds and datapacks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new level directory with a starter level file
    Init {
        /// Name of the level to create
        name: String,
    },

    /// Compile a level into a datapack and optional region snapshots
    Build {
        /// Level file
        #[arg(short, long, default_value = "level.json")]
        level: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "build")]
        out: PathBuf,

        /// Function namespace (default: derived from the level name)
        #[arg(long)]
        namespace: Option<String>,

        /// Datapack format number
        #[arg(long)]
        pack_format: Option<u32>,

        /// Also write region snapshots of the compiled world
        #[arg(long)]
        regions: bool,
    },

    /// Validate a level without writing anything
    Check {
        /// Level file
        #[arg(short, long, default_value = "level.json")]
        level: PathBuf,
    },

    /// List the entities of a level in stack order
    List {
        /// Only entities of this type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Level file
        #[arg(short, long, default_value = "level.json")]
        level: PathBuf,
    },

    /// Show the attributes and outputs of an entity
    Show {
        /// Entity name
        name: String,

        /// Level file
        #[arg(short, long, default_value = "level.json")]
        level: PathBuf,
    },

    /// List registered entity types, attribute types and enums
    Types,

    /// Add a new entity to a level file
    New {
        /// Entity type (e.g. logic_relay, world_brush)
        type_name: String,

        /// Entity name; a numeric suffix is added if it is taken
        name: String,

        /// Position as x,y,z
        #[arg(short, long, default_value = "0,0,0")]
        at: String,

        /// Level file
        #[arg(short, long, default_value = "level.json")]
        level: PathBuf,
    },

    /// Parse SNBT text and print it in canonical form
    Snbt {
        /// SNBT text
        text: String,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { name } => commands::init::run(&name),
        Commands::Build {
            level,
            out,
            namespace,
            pack_format,
            regions,
        } => commands::build::run(&level, &out, namespace, pack_format, regions),
        Commands::Check { level } => commands::check::run(&level),
        Commands::List { type_name, level } => commands::list::run(&level, type_name.as_deref()),
        Commands::Show { name, level } => commands::show::run(&level, &name),
        Commands::Types => commands::types::run(),
        Commands::New {
            type_name,
            name,
            at,
            level,
        } => commands::new::run(&level, &type_name, &name, &at),
        Commands::Snbt { text } => commands::snbt::run(&text),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
