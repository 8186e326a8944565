//! Common test utilities: fake ffmpeg executables.
//!
//! Every script is written once, before any test spawns a process, so no
//! script is still open for writing when another test executes it.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Directory holding the fake tools.
pub struct FakeTools {
    dir: TempDir,
}

static TOOLS: Lazy<FakeTools> = Lazy::new(FakeTools::create);

/// Returns the shared fake tools, writing them on first use.
pub fn tools() -> &'static FakeTools {
    &TOOLS
}

const SCRIPTS: &[(&str, &str)] = &[
    (
        "ffmpeg-4.3",
        r#"echo "ffmpeg version 4.3.1 Copyright (c) 2000-2020 the FFmpeg developers"
echo "libavutil      56. 51.100 / 56. 51.100" >&2
"#,
    ),
    (
        "ffmpeg-3.4",
        r#"echo "ffmpeg version 3.4.8-0ubuntu0.2 Copyright (c) 2000-2020 the FFmpeg developers"
"#,
    ),
    (
        "ffmpeg-snapshot",
        r#"echo "ffmpeg version N-104465-g08a501946f Copyright (c) 2015-2021 the FFmpeg developers"
"#,
    ),
    (
        "ffmpeg-stderr-banner",
        r#"echo "ffmpeg version n5.1 Copyright (c) 2000-2022 the FFmpeg developers" >&2
exit 1
"#,
    ),
    (
        "not-ffmpeg",
        r#"echo "usage: not-ffmpeg [options]"
"#,
    ),
    // Copies the input to the output and records the argument vector.
    (
        "convert-copy",
        r#"src="$2"
for last; do :; done
sleep 0.2
cp "$src" "$last" || exit 1
printf '%s\n' "$@" > "$last.args"
echo "converted $src"
echo "debug: muxing overhead 0.1%" >&2
"#,
    ),
    (
        "convert-fail-17",
        r#"echo "stdout line"
echo "Invalid data found when processing input" >&2
exit 17
"#,
    ),
    (
        "convert-noisy-fail",
        r#"head -c 1048576 /dev/zero | tr '\0' 'x' >&2
exit 3
"#,
    ),
    ("convert-killed", "kill -9 $$\n"),
    ("convert-silent", "exit 0\n"),
    // Leaves `<destination>.spawned` behind when started.
    (
        "spawn-marker",
        r#"for last; do :; done
touch "$last.spawned"
"#,
    ),
    // Leaves `<destination>.finished` behind only if it runs to completion.
    (
        "convert-slow",
        r#"for last; do :; done
sleep 1
touch "$last.finished"
"#,
    ),
];

impl FakeTools {
    fn create() -> Self {
        let dir = TempDir::new().expect("Failed to create tools dir");
        for (name, body) in SCRIPTS {
            write_script(dir.path(), name, body);
        }
        Self { dir }
    }

    /// Path of a fake tool by name.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    {
        let mut file = File::create(&path).expect("Failed to create script");
        writeln!(file, "#!/bin/sh").expect("Failed to write script");
        file.write_all(body.as_bytes()).expect("Failed to write script");
        file.sync_all().expect("Failed to sync script");
    }

    let mut permissions = fs::metadata(&path).expect("Failed to stat script").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("Failed to chmod script");
}

/// Create a source file with the given content.
pub fn create_source_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to create source file");
    path
}
