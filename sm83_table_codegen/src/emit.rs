// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rust source rendering.
//!
//! The rendered file is self-contained: it declares its own row types next to the tables so the
//! consuming crate only needs to `include!` it. Layout depends on the [`Profile`] the tables were
//! compiled under.

use crate::keyword::{KEYWORD_SLOTS, Keyword, KeywordSeq};
use crate::operand::{NormalizedOperand, OPERAND_NAME_LEN};
use crate::profile::{PrefixedLayout, Profile};
use crate::schema::{CYCLE_SLOTS, FlagEffect, FlagMap, Page};
use crate::table::{DecodeRow, EncodeRow, Tables};

// Keyword discriminants are rendered as `u8`.
const _: () = assert!(Keyword::ALL.len() < 256);

/// Renders `tables` as one Rust source file.
#[must_use]
pub fn render(tables: &Tables) -> String {
    let profile = tables.profile();
    let mut out = String::new();
    out.push_str("// Copyright 2026 the SM83 Table Authors\n");
    out.push_str("// SPDX-License-Identifier: Apache-2.0 OR MIT\n\n");
    out.push_str("// @generated by sm83_table_codegen. Do not edit by hand.\n\n");

    render_constants(&mut out, profile);
    render_types(&mut out);
    render_keyword(&mut out);

    let unprefixed = tables.page(Page::Unprefixed).unwrap_or_default();
    let cbprefixed = tables.page(Page::CbPrefixed).unwrap_or_default();
    match profile.prefixed {
        PrefixedLayout::Omit => render_decode_table(
            &mut out,
            "OPCODE_TABLE",
            "Decode table indexed by opcode byte.",
            unprefixed.iter(),
        ),
        PrefixedLayout::Separate => {
            render_decode_table(
                &mut out,
                "OPCODE_TABLE",
                "Decode table for single-byte opcodes, indexed by opcode byte.",
                unprefixed.iter(),
            );
            out.push('\n');
            render_decode_table(
                &mut out,
                "CB_OPCODE_TABLE",
                "Decode table for `0xcb`-prefixed opcodes, indexed by the byte after the prefix.",
                cbprefixed.iter(),
            );
        }
        PrefixedLayout::Combined => render_decode_table(
            &mut out,
            "OPCODE_TABLE",
            "Decode table for both pages, indexed by `prefixed * 256 + byte`.",
            unprefixed.iter().chain(cbprefixed),
        ),
    }

    if profile.encode_table {
        out.push('\n');
        render_encode_table(&mut out, tables.encode());
    }
    out
}

fn render_constants(out: &mut String, profile: Profile) {
    out.push_str("/// Operand slots per decode row.\n");
    out.push_str(&format!("pub const OPERAND_SLOTS: usize = {};\n", profile.operand_slots));
    out.push_str("/// Keyword slots per row: the mnemonic plus up to three operands.\n");
    out.push_str(&format!("pub const KEYWORD_SLOTS: usize = {KEYWORD_SLOTS};\n"));
    out.push_str("/// Bytes in an operand name.\n");
    out.push_str(&format!("pub const OPERAND_NAME_LEN: usize = {OPERAND_NAME_LEN};\n"));
    out.push_str("/// Cycle slots per row: `[taken, not-taken]`.\n");
    out.push_str(&format!("pub const CYCLE_SLOTS: usize = {CYCLE_SLOTS};\n"));
    out.push_str("/// Flag character for a flag the instruction leaves alone.\n");
    out.push_str(&format!(
        "pub const FLAG_UNAFFECTED: char = {:?};\n\n",
        FlagEffect::UNAFFECTED
    ));
}

fn render_types(out: &mut String) {
    out.push_str("/// One operand slot. Unused slots hold [`Operand::EMPTY`].\n");
    out.push_str("#[allow(missing_docs, reason = \"generated\")]\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq)]\n");
    out.push_str("pub struct Operand {\n");
    out.push_str("    /// Lowercased name, zero padded.\n");
    out.push_str("    pub name: [u8; OPERAND_NAME_LEN],\n");
    out.push_str("    pub immediate: bool,\n");
    out.push_str("    pub increment: bool,\n");
    out.push_str("    pub decrement: bool,\n");
    out.push_str("    pub bytes: u8,\n");
    out.push_str("}\n\n");

    out.push_str("impl Operand {\n");
    out.push_str("    /// The padding sentinel.\n");
    out.push_str(
        "    pub const EMPTY: Self = Self::new([0; OPERAND_NAME_LEN], false, false, false, 0);\n\n",
    );
    out.push_str("    const fn new(name: [u8; OPERAND_NAME_LEN], immediate: bool, increment: bool, decrement: bool, bytes: u8) -> Self {\n");
    out.push_str("        Self { name, immediate, increment, decrement, bytes }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");

    out.push_str(
        "/// Flag effects, one character each: `-`, `0`, `1`, or the flag's own letter.\n",
    );
    out.push_str("#[allow(missing_docs, reason = \"generated\")]\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq)]\n");
    out.push_str("pub struct OpcodeFlags {\n");
    out.push_str("    pub z: char,\n");
    out.push_str("    pub n: char,\n");
    out.push_str("    pub h: char,\n");
    out.push_str("    pub c: char,\n");
    out.push_str("}\n\n");

    out.push_str("/// One decode row.\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq)]\n");
    out.push_str("pub struct Opcode {\n");
    out.push_str("    /// Opcode byte (after the `0xcb` prefix for prefixed rows).\n");
    out.push_str("    pub code: u8,\n");
    out.push_str(
        "    /// Lowercased mnemonic, with an `i`/`d` suffix for post-increment/decrement forms.\n",
    );
    out.push_str("    pub mnemonic: &'static str,\n");
    out.push_str("    /// Encoded length in bytes, prefix included.\n");
    out.push_str("    pub bytes: u8,\n");
    out.push_str("    /// Sum of `cycles`.\n");
    out.push_str("    pub total_cycles: u8,\n");
    out.push_str(
        "    /// `[taken, not-taken]`; the second slot is zero when one count is declared.\n",
    );
    out.push_str("    pub cycles: [u8; CYCLE_SLOTS],\n");
    out.push_str("    /// Declared operands in `operands`.\n");
    out.push_str("    pub num_operands: u8,\n");
    out.push_str("    /// Operand slots.\n");
    out.push_str("    pub operands: [Operand; OPERAND_SLOTS],\n");
    out.push_str("    /// `false` when the instruction accesses memory through an operand.\n");
    out.push_str("    pub immediate: bool,\n");
    out.push_str("    /// Flag effects.\n");
    out.push_str("    pub flags: OpcodeFlags,\n");
    out.push_str("    /// `true` for `0xcb`-prefixed rows.\n");
    out.push_str("    pub prefixed: bool,\n");
    out.push_str("    /// Real keywords in `words`.\n");
    out.push_str("    pub num_words: u8,\n");
    out.push_str("    /// Canonical keywords, padded with [`Keyword::Nil`].\n");
    out.push_str("    pub words: [Keyword; KEYWORD_SLOTS],\n");
    out.push_str("}\n\n");

    out.push_str("/// One encode row: a keyword sequence and the opcode it assembles to.\n");
    out.push_str("#[allow(missing_docs, reason = \"generated\")]\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq)]\n");
    out.push_str("pub struct Encoding {\n");
    out.push_str("    pub num_words: u8,\n");
    out.push_str("    pub words: [Keyword; KEYWORD_SLOTS],\n");
    out.push_str("    pub code: u8,\n");
    out.push_str("    pub prefixed: bool,\n");
    out.push_str("}\n\n");
}

fn render_keyword(out: &mut String) {
    out.push_str("/// Canonical instruction tokens.\n");
    out.push_str("#[allow(missing_docs, reason = \"generated\")]\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]\n");
    out.push_str("#[repr(u8)]\n");
    out.push_str("pub enum Keyword {\n");
    for (discriminant, keyword) in (0_u8..).zip(Keyword::ALL) {
        out.push_str(&format!("    {} = 0x{discriminant:02X},\n", keyword.variant_name()));
    }
    out.push_str("}\n\n");

    out.push_str("impl Keyword {\n");
    out.push_str("    /// Every keyword, in discriminant order.\n");
    out.push_str("    pub const ALL: &'static [Self] = &[\n");
    for keyword in Keyword::ALL {
        out.push_str(&format!("        Self::{},\n", keyword.variant_name()));
    }
    out.push_str("    ];\n\n");

    out.push_str("    /// The `keyword_*` symbol.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn symbol(self) -> &'static str {\n");
    out.push_str("        match self {\n");
    for keyword in Keyword::ALL {
        out.push_str(&format!(
            "            Self::{} => \"{}\",\n",
            keyword.variant_name(),
            keyword.symbol()
        ));
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");
}

fn render_decode_table<'a>(
    out: &mut String,
    name: &str,
    doc: &str,
    rows: impl Iterator<Item = &'a DecodeRow>,
) {
    let rows: Vec<&DecodeRow> = rows.collect();
    out.push_str(&format!("/// {doc}\n"));
    out.push_str("#[rustfmt::skip]\n");
    out.push_str(&format!("pub static {name}: [Opcode; {}] = [\n", rows.len()));
    for row in rows {
        out.push_str(&format!("    {}, // {}\n", fmt_decode_row(row), row.opcode));
    }
    out.push_str("];\n");
}

fn render_encode_table(out: &mut String, rows: &[EncodeRow]) {
    out.push_str("/// Number of encodable keyword sequences.\n");
    out.push_str(&format!("pub const ENCODE_FORMS: usize = {};\n\n", rows.len()));
    out.push_str("/// Encode table in ascending (page, opcode) order.\n");
    out.push_str("#[rustfmt::skip]\n");
    out.push_str("pub static ENCODE_TABLE: [Encoding; ENCODE_FORMS] = [\n");
    for row in rows {
        out.push_str(&format!(
            "    Encoding {{ num_words: {}, words: {}, code: 0x{:02X}, prefixed: {} }},\n",
            row.keywords.len(),
            fmt_words(&row.keywords),
            row.opcode.byte,
            row.prefixed()
        ));
    }
    out.push_str("];\n");
}

fn fmt_decode_row(row: &DecodeRow) -> String {
    let operands: Vec<String> = row.operands.as_slice().iter().map(fmt_operand).collect();
    format!(
        "Opcode {{ code: 0x{:02X}, mnemonic: {:?}, bytes: {}, total_cycles: {}, cycles: [{}, {}], num_operands: {}, operands: [{}], immediate: {}, flags: {}, prefixed: {}, num_words: {}, words: {} }}",
        row.opcode.byte,
        row.mnemonic,
        row.bytes,
        row.total_cycles,
        row.cycles[0],
        row.cycles[1],
        row.operands.len(),
        operands.join(", "),
        row.immediate,
        fmt_flags(row.flags),
        row.prefixed(),
        row.keywords.len(),
        fmt_words(&row.keywords),
    )
}

fn fmt_operand(operand: &NormalizedOperand) -> String {
    if operand.is_empty() {
        return "Operand::EMPTY".to_owned();
    }
    format!(
        "Operand::new(*b\"{}\", {}, {}, {}, {})",
        fmt_name_bytes(&operand.name),
        operand.immediate,
        operand.increment,
        operand.decrement,
        operand.bytes
    )
}

fn fmt_name_bytes(name: &[u8]) -> String {
    let mut s = String::with_capacity(name.len() * 4);
    for &b in name {
        match b {
            0 => s.push_str("\\0"),
            b'"' | b'\\' => s.push_str(&format!("\\x{b:02x}")),
            b if b.is_ascii_graphic() => s.push(char::from(b)),
            b => s.push_str(&format!("\\x{b:02x}")),
        }
    }
    s
}

fn fmt_flags(flags: FlagMap) -> String {
    let [z, n, h, c] = flags.chars();
    format!("OpcodeFlags {{ z: {z:?}, n: {n:?}, h: {h:?}, c: {c:?} }}")
}

fn fmt_words(seq: &KeywordSeq) -> String {
    let words: Vec<String> = seq
        .slots()
        .iter()
        .map(|k| format!("Keyword::{}", k.variant_name()))
        .collect();
    format!("[{}]", words.join(", "))
}
