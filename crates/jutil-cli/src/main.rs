use anyhow::Context as _;
use clap::Parser;
use jutil_core::{
    CoercionType, Command, JsonOpts, Options, Request, WriteMode, execute, load_document,
    save_document,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "jutil",
    about = "Read and edit a JSON file by dotted or slashed path",
    version
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// JSON file to operate on
    file: PathBuf,
    /// One of set, add, replace, delete, get, validate, echo, pretty (default: echo)
    #[arg(value_name = "CMD")]
    cmd: Option<String>,
    /// Key path, e.g. a/b/c or a.b.c; escape literal separators as \. or \/
    #[arg(value_name = "PATH")]
    path: Option<String>,
    /// New value for set, add and replace
    #[arg(value_name = "VALUE", allow_negative_numbers = true)]
    value: Option<String>,
    /// Force the value type: string, number, boolean, object or null
    #[arg(long = "type", value_name = "T")]
    value_type: Option<String>,
    /// Indent for pretty output; a number means that many spaces
    #[arg(long, default_value = "\t", hide_default_value = true)]
    indent: String,
    /// Print JSON on a single line
    #[arg(long, default_value_t = false)]
    compact: bool,
    /// Write to a temp file and rename it over the original
    #[arg(long, default_value_t = false)]
    atomic: bool,
    /// Don't print informational messages
    #[arg(long, default_value_t = false)]
    quiet: bool,
    /// Print the resulting JSON instead of writing the file
    #[arg(long, aliases = ["dry-run", "debug"], default_value_t = false)]
    dryrun: bool,
    /// Log traversal and coercion decisions to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(if verbose { "debug" } else { "warn" })
            .context("building log filter")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(anyhow::Error::msg)
}

fn run(cli: Cli) -> jutil_core::Result<()> {
    // argument problems surface before the file is opened
    let command = cli
        .cmd
        .as_deref()
        .map(str::parse::<Command>)
        .transpose()?
        .unwrap_or_default();
    let value_type = cli
        .value_type
        .as_deref()
        .map(str::parse::<CoercionType>)
        .transpose()?;
    let req = Request::new(command, cli.file, cli.path.as_deref(), cli.value, value_type)?;
    let opts = Options {
        json: JsonOpts {
            compact: cli.compact,
            indent: cli.indent,
        },
        write_mode: if cli.atomic { WriteMode::Atomic } else { WriteMode::Direct },
        quiet: cli.quiet,
        dry_run: cli.dryrun,
    };
    debug!(?req, ?opts, "parsed arguments");

    let mut doc = load_document(&req.file)?;
    let out = execute(&mut doc, &req, &opts)?;

    if let Some(msg) = &out.message
        && !opts.quiet
    {
        println!("{}", msg);
    }
    if let Some(payload) = &out.payload {
        print!("{}", payload);
    }
    if let Some(text) = &out.save {
        save_document(&req.file, text, opts.write_mode)?;
        if !opts.quiet {
            println!("File saved: {}", req.file.display());
        }
    }
    Ok(())
}
