//! Shell stand-ins for `javac` and `java`
//!
//! The fake compiler fails when the source mentions `COMPILE_ERROR`, exits
//! cleanly without output for `NO_CLASS`, warns on `WARN`, and otherwise
//! touches the class file. The fake runtime prints `ran <Class>`, fails on
//! `STDERR` and hangs on `SLEEP`.

use std::path::Path;

use tempfile::TempDir;

use crate::config::{CommandConfig, Config, WorkspaceConfig};
use crate::runner::Runner;

const COMPILE_SCRIPT: &str = r#"
if grep -q COMPILE_ERROR "$1"; then
    echo "$1:3: error: illegal start of expression" >&2
    exit 1
fi
if grep -q NO_CLASS "$1"; then
    exit 0
fi
if grep -q WARN "$1"; then
    echo "$1:1: warning: [deprecation] something is deprecated" >&2
fi
touch "$3/$2.class"
"#;

const RUN_SCRIPT: &str = r#"
src="$1/$2.java"
if grep -q STDERR "$src"; then
    echo 'Exception in thread "main" java.lang.RuntimeException' >&2
    exit 1
fi
if grep -q SLEEP "$src"; then
    exec sleep 5
fi
echo "ran $2"
"#;

pub(crate) fn fake_config(root: &Path, isolate_requests: bool) -> Config {
    let mut config = Config::default();
    config.workspace = WorkspaceConfig {
        root: root.to_path_buf(),
        isolate_requests,
    };
    config.toolchain.compile = CommandConfig::new([
        "sh",
        "-c",
        COMPILE_SCRIPT,
        "javac",
        "{source}",
        "{class}",
        "{dir}",
    ]);
    config.toolchain.run = CommandConfig::new(["sh", "-c", RUN_SCRIPT, "java", "{dir}", "{class}"]);
    config.default_limits.wall_time_limit = Some(5.0);
    config
}

pub(crate) fn fake_runner(isolate_requests: bool) -> (Runner, TempDir) {
    let root = tempfile::tempdir().expect("failed to create temp dir");
    let runner = Runner::new(fake_config(root.path(), isolate_requests));
    (runner, root)
}
