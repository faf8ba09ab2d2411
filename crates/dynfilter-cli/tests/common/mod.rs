//! Common test utilities shared across integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;

/// Get the workspace root directory
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // Go up from crates/dynfilter-cli to workspace root
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .expect("crate lives two levels below the workspace root")
        .to_path_buf()
}

/// Builds the binary once per test process and returns its path
pub fn get_dynfilter_binary() -> PathBuf {
    static BINARY: OnceLock<PathBuf> = OnceLock::new();

    BINARY
        .get_or_init(|| {
            let workspace = workspace_root();

            let status = Command::new("cargo")
                .args(["build", "--package", "dynfilter-cli", "--quiet"])
                .current_dir(&workspace)
                .status()
                .expect("Failed to build dynfilter");

            assert!(status.success(), "Failed to build dynfilter binary");

            workspace.join("target/debug/dynfilter")
        })
        .clone()
}

/// Run the dynfilter binary in the specified directory
pub fn run_dynfilter_in_dir(dir: &Path, args: &[&str]) -> Output {
    run_dynfilter_with_stdin(dir, args, "")
}

/// Run the dynfilter binary in the specified directory, feeding `stdin`
pub fn run_dynfilter_with_stdin(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let binary = get_dynfilter_binary();

    let mut child = Command::new(&binary)
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute dynfilter binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child
        .wait_with_output()
        .expect("Failed to wait for dynfilter binary")
}

/// Parse stdout of a successful run as JSON
pub fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "dynfilter failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}
