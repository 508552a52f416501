//! Resource test utilities

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};

use http_resource::resource::{Command as Verb, Dispatcher, Request, ResourceError, Response};

/// Index page with links `/links/10/0` .. `/links/10/9`, like a directory listing
pub fn links_index() -> String {
    let links: String = (0..10)
        .map(|n| format!("<a href='/links/10/{n}'>{n}</a> "))
        .collect();
    format!("<html><head><title>Links</title></head><body>{links}</body></html>")
}

/// Pattern capturing the numeric segment of each link in [`links_index`]
pub const LINKS_PATTERN: &str = "href='/links/10/(?P<version>[0-9]+)'";

/// Build a request from loose JSON parts
pub fn request(source: Value, version: Option<Value>) -> Request {
    let mut input = json!({ "source": source });
    if let Some(version) = version {
        input["version"] = version;
    }
    serde_json::from_value(input).unwrap()
}

/// Run one command through the dispatcher, returning the response and
/// whatever was written to the progress stream
pub async fn dispatch(
    verb: &str,
    request: &Request,
    args: &[&str],
) -> (Result<Response, ResourceError>, Vec<u8>) {
    let verb: Verb = verb.parse().unwrap();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let mut dispatcher = Dispatcher::new(Vec::new());

    let result = dispatcher.dispatch(&verb, request, &args).await;

    (result, dispatcher.into_progress())
}

/// Run the compiled binary as the orchestrator would
pub fn run_binary(verb: &str, input: &Value, args: &[&Path]) -> Output {
    run_binary_raw(verb, &input.to_string(), args, None)
}

/// Run the compiled binary with `input` written verbatim to stdin, optionally
/// pointing its temporary directory at `tmp_dir`
pub fn run_binary_raw(verb: &str, input: &str, args: &[&Path], tmp_dir: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_http-resource"));
    command
        .arg(verb)
        .args(args)
        .env_remove("RESOURCE_DEBUG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = tmp_dir {
        command.env("TMPDIR", dir);
    }
    let mut child = command.spawn().unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    child.wait_with_output().unwrap()
}
