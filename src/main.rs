use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, error};

use http_resource::config::debug_requested;
use http_resource::log::Diagnostics;
use http_resource::resource::{Command, Dispatcher, Request};

/// Names the binary is linked as by the orchestrator (`/opt/resource/<verb>`)
const LINK_NAMES: &[&str] = &["check", "in", "out"];

#[derive(Parser, Debug)]
#[command(name = "http-resource")]
#[command(version, about = "CI resource for versioned artifacts served over HTTP")]
struct Cli {
    /// Command to run: check or in (other verbs are accepted and do nothing)
    command: String,

    /// Command arguments; `in` expects the target directory
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(resolve_invocation(std::env::args_os()));

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    // no diagnostics sink exists yet
    let staged = stage_raw_input(&std::env::temp_dir(), &cli.command, &input)
        .inspect_err(|e| eprintln!("Failed to stage input: {}", e))
        .ok();

    let request = Request::parse(&input)?;

    let diagnostics = Diagnostics::select(debug_requested(&request.source))?;
    let _guard = diagnostics.install();
    if let Some(path) = diagnostics.log_file() {
        debug!("Logging to {:?}", path);
    }
    if let Some(path) = staged {
        debug!("Input staged at {:?}", path);
    }

    let command: Command = cli.command.parse()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut dispatcher = Dispatcher::new(std::io::stderr());
    let response = runtime
        .block_on(dispatcher.dispatch(&command, &request, &cli.args))
        .inspect_err(|e| error!("{} failed: {}", command.as_str(), e))?;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// When invoked through a verb link, argv[0] names the command; turn that
/// into the explicit `http-resource <verb> ...` form.
fn resolve_invocation<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();

    let linked_verb = args
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| LINK_NAMES.contains(name))
        .map(OsString::from);

    if let Some(verb) = linked_verb {
        args.insert(1, verb);
    }

    args
}

/// Keep a private copy of the raw input in `dir` for post-mortem debugging
fn stage_raw_input(dir: &Path, command: &str, input: &str) -> std::io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{command}-"))
        .tempfile_in(dir)?;
    file.write_all(input.as_bytes())?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}
