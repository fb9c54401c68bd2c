mod commands;
mod error;

use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;

use commands::{Format, Options};

#[derive(Debug)]
struct ParseFormatError(String);

impl std::error::Error for ParseFormatError {}

impl std::fmt::Display for ParseFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown file format: {}", self.0)
    }
}

fn parse_format(src: &str) -> std::result::Result<Format, ParseFormatError> {
    let format = match src {
        "properties" | "props" => Format::Properties,
        "json" => Format::Json,
        _ => return Err(ParseFormatError(src.to_string())),
    };

    Ok(format)
}

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(name = "get", visible_alias = "g", about = "Print the value of a key")]
    Get {
        #[structopt(
            name = "propfile",
            parse(from_os_str),
            help = "Path to the property file"
        )]
        path: PathBuf,

        #[structopt(help = "Key to look up")]
        key: String,
    },

    #[structopt(
        name = "set",
        visible_alias = "s",
        about = "Set a key, creating the file if needed"
    )]
    Set {
        #[structopt(
            name = "propfile",
            parse(from_os_str),
            help = "Path to the property file"
        )]
        path: PathBuf,

        #[structopt(help = "Key to set")]
        key: String,

        #[structopt(help = "Value to store")]
        value: String,
    },

    #[structopt(name = "remove", visible_alias = "rm", about = "Remove a key")]
    Remove {
        #[structopt(
            name = "propfile",
            parse(from_os_str),
            help = "Path to the property file"
        )]
        path: PathBuf,

        #[structopt(help = "Key to remove")]
        key: String,
    },

    #[structopt(name = "list", visible_alias = "ls", about = "List the keys of a file")]
    List {
        #[structopt(
            name = "propfile",
            parse(from_os_str),
            help = "Path to the property file"
        )]
        path: PathBuf,

        #[structopt(short = "V", long, help = "Print `key=value` instead of keys only")]
        values: bool,
    },

    #[structopt(
        name = "convert",
        visible_alias = "c",
        about = "Write a file out in another format"
    )]
    Convert {
        #[structopt(
            name = "propfile",
            parse(from_os_str),
            help = "Path to the property file"
        )]
        path: PathBuf,

        #[structopt(name = "dest", parse(from_os_str), help = "Path to write to")]
        dest: PathBuf,

        #[structopt(
            long,
            parse(try_from_str = parse_format),
            default_value = "json",
            help = "Output format [properties, json]"
        )]
        to: Format,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "props",
    about = "Read and edit .properties files.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands]
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(
        short = "F",
        long,
        parse(try_from_str = parse_format),
        default_value = "properties",
        global = true,
        help = "Format of the input file [properties, json]"
    )]
    format: Format,

    #[structopt(
        short,
        long,
        global = true,
        help = "Decode escape sequences when reading .properties files, and escape backslashes when writing them"
    )]
    unescape: bool,

    #[structopt(
        long,
        global = true,
        help = "Write through a temporary file and rename it into place"
    )]
    atomic: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());

    let level = if opts.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let options = Options {
        format: opts.format,
        unescape: opts.unescape,
        atomic: opts.atomic,
    };

    let result = match opts.cmd {
        Commands::Get { path, key } => commands::get(path, key, options),
        Commands::Set { path, key, value } => commands::set(path, key, value, options),
        Commands::Remove { path, key } => commands::remove(path, key, options),
        Commands::List { path, values } => commands::list(path, values, options),
        Commands::Convert { path, dest, to } => commands::convert(path, dest, to, options),
    };

    if let Err(e) = result {
        eprintln!("{:?}", anyhow::Error::from(e));
        std::process::exit(1);
    }
}
