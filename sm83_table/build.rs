// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiles `gb-opcodes/Opcodes.json` into `$OUT_DIR/opcodes_gen.rs`.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sm83_table_codegen::{Profile, Schema, generate};

fn main() -> Result<()> {
    let manifest_dir =
        PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR is not set")?);
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").context("OUT_DIR is not set")?);
    let schema_path = manifest_dir.join("gb-opcodes/Opcodes.json");
    println!("cargo:rerun-if-changed={}", schema_path.display());
    println!("cargo:rerun-if-changed=build.rs");

    let schema = Schema::load(&schema_path)?;
    let rendered = generate(&schema, Profile::FULL)
        .with_context(|| format!("compile {}", schema_path.display()))?;

    let out_path = out_dir.join("opcodes_gen.rs");
    fs::write(&out_path, rendered).with_context(|| format!("write {}", out_path.display()))?;
    Ok(())
}
