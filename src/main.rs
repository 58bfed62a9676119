#![forbid(unsafe_code)]

mod ui;

use clap::{ArgAction, Parser, Subcommand};
use esar::archive;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "esar", version, about = "ESAR archive bundler and reader")]
struct Cli {
    /// More log output (repeatable). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive wizard for packing a directory (terminal).
    Ui,

    /// Pack an input directory into an archive.
    Pack {
        /// Input directory.
        #[arg(long)]
        input: PathBuf,
        /// Output archive file.
        #[arg(long)]
        output: PathBuf,
        /// Optional name prefix inside the archive (e.g. "assets/").
        #[arg(long, default_value = "")]
        prefix: String,
        /// Exclude substring (repeatable). Simple contains() filter on normalized names.
        #[arg(long)]
        exclude: Vec<String>,
        /// Media type for every entry. Guessed from the extension when omitted.
        #[arg(long = "type")]
        media_type: Option<String>,
    },

    /// List entries in an archive.
    List {
        #[arg(long)]
        archive: PathBuf,
        /// Print checksum, type, size and timestamp too.
        #[arg(short, long, default_value_t = false)]
        long: bool,
    },

    /// Extract an archive to an output directory.
    Extract {
        #[arg(long)]
        archive: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Only extract entries that contain this substring (repeatable).
        #[arg(long)]
        filter: Vec<String>,
        /// Skip checksum verification.
        #[arg(long, default_value_t = false)]
        no_verify: bool,
    },

    /// Verify archive structure and checksum.
    Verify {
        #[arg(long)]
        archive: PathBuf,
    },

    /// Write one entry's content to stdout.
    Cat {
        #[arg(long)]
        archive: PathBuf,
        #[arg(long)]
        name: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("esar={level}")));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cmd: Command) -> archive::ArchiveResult<()> {
    match cmd {
        Command::Ui => ui::run(),
        Command::Pack {
            input,
            output,
            prefix,
            exclude,
            media_type,
        } => {
            let n = archive::pack(&input, &output, &prefix, &exclude, media_type.as_deref())?;
            println!("packed {n} entries into {}", output.display());
            Ok(())
        }
        Command::List { archive: path, long } => archive::list(&path, long, &mut std::io::stdout().lock()),
        Command::Extract {
            archive: path,
            output,
            filter,
            no_verify,
        } => {
            let n = archive::extract(&path, &output, &filter, !no_verify)?;
            println!("extracted {n} files to {}", output.display());
            Ok(())
        }
        Command::Verify { archive: path } => {
            let n = archive::verify(&path)?;
            println!("ok: {n} entries");
            Ok(())
        }
        Command::Cat { archive: path, name } => archive::cat(&path, &name, &mut std::io::stdout().lock()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.cmd) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
