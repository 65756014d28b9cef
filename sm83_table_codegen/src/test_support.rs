// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Schema fixtures shared by the unit tests.

use std::path::PathBuf;

use crate::schema::Schema;

/// Path of the schema checked into the `sm83_table` crate.
pub(crate) fn shipped_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("sm83_table/gb-opcodes/Opcodes.json")
}

pub(crate) fn shipped_schema() -> Schema {
    Schema::load(&shipped_schema_path()).expect("load shipped schema")
}

/// A record with no operands and no flag effects.
pub(crate) fn record(mnemonic: &str, bytes: u8, cycles: &str, operands: &str) -> String {
    format!(
        r#"{{"mnemonic": "{mnemonic}", "bytes": {bytes}, "cycles": {cycles}, "operands": {operands}, "immediate": true, "flags": {{"Z": "-", "N": "-", "H": "-", "C": "-"}}}}"#
    )
}

/// Illegal opcodes never reach the encode table, so a page of them never collides.
pub(crate) fn filler(byte: u8) -> String {
    record(&format!("ILLEGAL_{byte:02X}"), 1, "[4]", "[]")
}

fn page_json(overrides: &[(u8, &str)]) -> String {
    let entries: Vec<String> = (0..=u8::MAX)
        .map(|byte| {
            let rec = overrides
                .iter()
                .find(|(b, _)| *b == byte)
                .map_or_else(|| filler(byte), |(_, rec)| (*rec).to_owned());
            format!("\"0x{byte:02x}\": {rec}")
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// A full schema document: filler everywhere except `unprefixed`/`cbprefixed` overrides.
pub(crate) fn schema_json(unprefixed: &[(u8, &str)], cbprefixed: Option<&[(u8, &str)]>) -> String {
    match cbprefixed {
        Some(cb) => format!(
            r#"{{"unprefixed": {}, "cbprefixed": {}}}"#,
            page_json(unprefixed),
            page_json(cb)
        ),
        None => format!(r#"{{"unprefixed": {}}}"#, page_json(unprefixed)),
    }
}

pub(crate) fn schema(unprefixed: &[(u8, &str)], cbprefixed: Option<&[(u8, &str)]>) -> Schema {
    Schema::from_json(&schema_json(unprefixed, cbprefixed)).expect("fixture schema")
}
