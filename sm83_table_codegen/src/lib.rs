// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `sm83_table_codegen`: compiles the Game Boy SM83 opcode schema into decode and encode tables.
//!
//! The pipeline has four stages, each in its own module:
//! - [`schema`]: strict loading of the `gb-opcodes` JSON document,
//! - [`operand`]: operands normalized into fixed-capacity slots,
//! - [`keyword`]: context-sensitive canonicalization into a closed keyword vocabulary,
//! - [`table`] and [`emit`]: cross-checked rows, rendered as Rust source.
//!
//! This is a std-only build tool crate. The `sm83_table` crate runs it from its build script.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sm83_table_codegen::{Profile, Schema, generate};
//!
//! let schema = Schema::load(Path::new("sm83_table/gb-opcodes/Opcodes.json"))?;
//! let source = generate(&schema, Profile::FULL)?;
//! assert!(source.contains("pub static OPCODE_TABLE"));
//! # Ok::<(), sm83_table_codegen::GenError>(())
//! ```

pub mod emit;
pub mod error;
pub mod keyword;
pub mod operand;
pub mod profile;
pub mod schema;
pub mod table;

#[cfg(test)]
mod test_support;

pub use error::{GenError, SlotKind};
pub use keyword::{Keyword, KeywordSeq, canonicalize, classify};
pub use operand::{NormalizedOperand, OperandSlots, normalize_operands};
pub use profile::{PrefixedLayout, Profile};
pub use schema::{InstructionSpec, OpcodeRef, OperandSpec, Page, Schema};
pub use table::{DecodeRow, EncodeRow, Tables};

/// Compiles `schema` under `profile` and renders the generated source.
///
/// Every check runs before rendering starts, so an error means no output at all.
pub fn generate(schema: &Schema, profile: Profile) -> Result<String, GenError> {
    let tables = Tables::compile(schema, profile)?;
    Ok(emit::render(&tables))
}
