// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = "Command-line driver for `sm83_table_codegen`.\n\n\
          Usage: `sm83_table_codegen <out.rs>`. Run from the workspace root.\n"]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{Level, LevelFilter, Log, Metadata, Record};
use sm83_table_codegen::{Profile, Schema, generate};

/// Schema location, relative to the workspace root.
const SCHEMA_PATH: &str = "sm83_table/gb-opcodes/Opcodes.json";

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Writes `contents` next to `out`, then renames it into place.
fn write_output(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut tmp = out.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = fs::write(&tmp, contents.as_bytes())
        .with_context(|| format!("write {}", tmp.display()))
        .and_then(|()| {
            fs::rename(&tmp, out)
                .with_context(|| format!("rename {} to {}", tmp.display(), out.display()))
        });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn main() -> Result<()> {
    // Only fails if a logger is already installed.
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info));

    let mut args = std::env::args_os().skip(1);
    let (Some(out_path), None) = (args.next(), args.next()) else {
        bail!("usage: sm83_table_codegen <out.rs>");
    };
    let out_path = PathBuf::from(out_path);

    let schema_path = Path::new(SCHEMA_PATH);
    let schema = Schema::load(schema_path)?;
    let rendered = generate(&schema, Profile::default())
        .with_context(|| format!("compile {}", schema_path.display()))?;

    write_output(&out_path, &rendered)?;
    log::info!("wrote {}", out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("sm83_table_codegen_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn schema_path_is_the_shipped_schema() {
        let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let workspace_root = workspace_root.parent().expect("workspace root");
        let schema = Schema::load(&workspace_root.join(SCHEMA_PATH)).expect("load schema");
        assert!(schema.cbprefixed().expect("valid cbprefixed page").is_some());
    }

    #[test]
    fn output_is_written_through_a_temporary_file() {
        let dir = scratch_dir("write");
        let out = dir.join("nested/opcodes_gen.rs");
        write_output(&out, "// table\n").expect("write output");
        assert_eq!(fs::read_to_string(&out).expect("read output"), "// table\n");
        assert!(!dir.join("nested/opcodes_gen.rs.tmp").exists());

        write_output(&out, "// replaced\n").expect("overwrite output");
        assert_eq!(fs::read_to_string(&out).expect("read output"), "// replaced\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_rename_leaves_nothing_behind() {
        let dir = scratch_dir("rename");
        let out = dir.join("occupied");
        fs::create_dir_all(out.join("child")).expect("create directory at output path");
        assert!(write_output(&out, "// table\n").is_err());
        assert!(!dir.join("occupied.tmp").exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
