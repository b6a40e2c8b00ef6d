use anyhow::Result;
use bkl::commands::Session;
use bkl::commands::log::LogOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bkl",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "An append-only backup log of object id transitions",
    long_about = "Records every change of the object id tracked for a path \
    in an append-only log file, and prints the recorded history oldest or newest first.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "append",
        about = "Record a transition in a backup log",
        long_about = "This command appends one entry recording that <PATH> moved from object <OLD> to object <NEW>. \
        The committer is read from GIT_COMMITTER_NAME, GIT_COMMITTER_EMAIL and optionally GIT_COMMITTER_DATE. \
        Nothing is recorded when <OLD> and <NEW> are equal."
    )]
    Append {
        #[arg(index = 1, help = "The backup log file")]
        log: PathBuf,
        #[arg(index = 2, help = "The path whose object changed")]
        path: String,
        #[arg(index = 3, help = "The previous object SHA")]
        old: String,
        #[arg(index = 4, help = "The new object SHA")]
        new: String,
    },
    #[command(
        name = "log",
        about = "Show the entries of a backup log",
        long_about = "This command prints every entry of a backup log, oldest first unless --reverse is given. \
        A missing log file is treated as empty."
    )]
    Log {
        #[arg(index = 1, help = "The backup log file")]
        log: PathBuf,
        #[arg(short, long, help = "Show the newest entry first")]
        reverse: bool,
        #[arg(long, help = "Print lines exactly as stored")]
        raw: bool,
        #[arg(long, help = "Print one line per entry")]
        oneline: bool,
    },
    #[command(
        name = "hash",
        about = "Print the object id of a file",
        long_about = "This command prints the SHA-1 object id of a file's content."
    )]
    Hash {
        #[arg(index = 1)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::new(Box::new(std::io::stdout()));

    match &cli.command {
        Commands::Append {
            log,
            path,
            old,
            new,
        } => session.append(log, path, old, new)?,
        Commands::Log {
            log,
            reverse,
            raw,
            oneline,
        } => session.log(log, &LogOptions::new(*reverse, *raw, *oneline))?,
        Commands::Hash { file } => session.hash(file)?,
    }

    Ok(())
}
