// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyword canonicalization.
//!
//! Every mnemonic and operand token maps to exactly one member of the closed [`Keyword`]
//! vocabulary. A token's meaning depends on the instruction around it: `c` is register C in
//! `add a, c` and the carry condition in `jp c, a16`. Tokens are therefore always classified
//! together with the mnemonic that encloses them (see [`classify`]).
//!
//! Canonical symbols have the form `keyword_<body>`; operands read through memory get a
//! `deref_` marker (`keyword_deref_hl`), so the direct and indirect forms of a register never
//! share a keyword.

use core::fmt;

use crate::error::{GenError, SlotKind};
use crate::schema::InstructionSpec;

/// Keyword slots per row: the mnemonic plus up to three operands.
pub const KEYWORD_SLOTS: usize = 4;

/// Prefix of every canonical symbol.
pub const KEYWORD_PREFIX: &str = "keyword_";

/// Marker inserted for operands that dereference memory.
pub const DEREF_MARKER: &str = "deref_";

/// Mnemonics whose `c`/`nc`/`z`/`nz` operands are branch conditions.
pub const CONTROL_FLOW_HEADS: [&str; 4] = ["call", "ret", "jp", "jr"];

const REGISTERS: [&str; 12] = [
    "a", "b", "c", "d", "e", "h", "l", "af", "bc", "de", "hl", "sp",
];

macro_rules! vocabulary {
    ($($variant:ident => $body:literal,)*) => {
        /// A canonical instruction token.
        ///
        /// The vocabulary is closed: canonicalization fails for anything not listed here.
        /// [`Keyword::Nil`] pads unused keyword slots.
        #[allow(missing_docs, reason = "variants are named after their keyword body")]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The symbol body, e.g. `deref_hl` for `keyword_deref_hl`.
            #[must_use]
            pub const fn body(self) -> &'static str {
                match self {
                    $(Self::$variant => $body,)*
                }
            }

            /// The variant identifier used in generated code.
            #[must_use]
            pub const fn variant_name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

vocabulary! {
    Nil => "nil",
    Illegal => "illegal",

    Adc => "adc",
    Add => "add",
    And => "and",
    Bit => "bit",
    Call => "call",
    Ccf => "ccf",
    Cp => "cp",
    Cpl => "cpl",
    Daa => "daa",
    Dec => "dec",
    Di => "di",
    Ei => "ei",
    Halt => "halt",
    Inc => "inc",
    Jp => "jp",
    Jr => "jr",
    Ld => "ld",
    Ldd => "ldd",
    Ldh => "ldh",
    Ldi => "ldi",
    Nop => "nop",
    Or => "or",
    Pop => "pop",
    Prefix => "prefix",
    Push => "push",
    Res => "res",
    Ret => "ret",
    Reti => "reti",
    Rl => "rl",
    Rla => "rla",
    Rlc => "rlc",
    Rlca => "rlca",
    Rr => "rr",
    Rra => "rra",
    Rrc => "rrc",
    Rrca => "rrca",
    Rst => "rst",
    Sbc => "sbc",
    Scf => "scf",
    Set => "set",
    Sla => "sla",
    Sra => "sra",
    Srl => "srl",
    Stop => "stop",
    Sub => "sub",
    Swap => "swap",
    Xor => "xor",

    A => "a",
    B => "b",
    C => "c",
    D => "d",
    E => "e",
    H => "h",
    L => "l",
    Af => "af",
    Bc => "bc",
    De => "de",
    Hl => "hl",
    Sp => "sp",

    DerefA => "deref_a",
    DerefB => "deref_b",
    DerefC => "deref_c",
    DerefD => "deref_d",
    DerefE => "deref_e",
    DerefH => "deref_h",
    DerefL => "deref_l",
    DerefAf => "deref_af",
    DerefBc => "deref_bc",
    DerefDe => "deref_de",
    DerefHl => "deref_hl",
    DerefSp => "deref_sp",

    U8 => "u8",
    U16 => "u16",
    I8 => "i8",
    DerefU8 => "deref_u8",
    DerefU16 => "deref_u16",

    FlagCy => "flag_cy",
    FlagNc => "flag_nc",
    FlagZ => "flag_z",
    FlagNz => "flag_nz",

    Bit0 => "0",
    Bit1 => "1",
    Bit2 => "2",
    Bit3 => "3",
    Bit4 => "4",
    Bit5 => "5",
    Bit6 => "6",
    Bit7 => "7",

    Vec00 => "vec_00",
    Vec08 => "vec_08",
    Vec10 => "vec_10",
    Vec18 => "vec_18",
    Vec20 => "vec_20",
    Vec28 => "vec_28",
    Vec30 => "vec_30",
    Vec38 => "vec_38",
}

impl Keyword {
    /// The full `keyword_*` symbol.
    #[must_use]
    pub fn symbol(self) -> String {
        format!("{KEYWORD_PREFIX}{}", self.body())
    }

    /// Looks a keyword up by its body.
    #[must_use]
    pub fn from_body(body: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.body() == body)
    }

    /// Looks a keyword up by its full `keyword_*` symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        symbol.strip_prefix(KEYWORD_PREFIX).and_then(Self::from_body)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEYWORD_PREFIX}{}", self.body())
    }
}

/// What a token means in its context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenClass {
    /// A register name (`a`, `hl`, ...).
    Register,
    /// A branch condition (`nz`, `z`, `nc`, `c` under `call`/`ret`/`jp`/`jr`).
    Condition,
    /// An inline value placeholder (`n8`, `a16`, `e8`, ...).
    Immediate,
    /// A bit number for `bit`/`res`/`set`.
    BitIndex,
    /// A restart vector (`$38`).
    Vector,
    /// Any `illegal*` token.
    Illegal,
    /// Anything else: mnemonics, and tokens the vocabulary may reject.
    Other,
}

/// A classified token and its canonical body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canonical {
    /// The token's meaning.
    pub class: TokenClass,
    /// Canonical body, before any `deref_` marker.
    pub body: String,
}

/// Why a token has no keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MissReason {
    /// The token is empty.
    Empty,
    /// The canonical body contains a character that cannot appear in a symbol.
    IllegalCharacter(char),
    /// Bit numbers only exist on the `0xcb` page.
    BitIndexOutsidePrefixedPage,
    /// The body is well formed but names no vocabulary member.
    Unknown(String),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty token"),
            Self::IllegalCharacter(ch) => write!(f, "character {ch:?} cannot appear in a keyword"),
            Self::BitIndexOutsidePrefixedPage => {
                write!(f, "bit numbers only appear on the cbprefixed page")
            }
            Self::Unknown(symbol) => write!(f, "`{symbol}` is not in the keyword vocabulary"),
        }
    }
}

/// A token that could not be canonicalized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("token {token:?} has no keyword: {reason}")]
pub struct VocabularyMiss {
    /// The raw token.
    pub token: String,
    /// Why it was rejected.
    pub reason: MissReason,
}

/// Returns `true` for `call`, `ret`, `jp` and `jr` (in any case).
#[must_use]
pub fn is_control_flow(head: &str) -> bool {
    CONTROL_FLOW_HEADS
        .iter()
        .any(|cf| cf.eq_ignore_ascii_case(head))
}

fn placeholder_alias(token: &str) -> Option<&'static str> {
    Some(match token {
        "d8" | "n8" | "a8" => "u8",
        "d16" | "n16" | "a16" => "u16",
        "r8" | "e8" => "i8",
        _ => return None,
    })
}

fn condition_alias(token: &str) -> Option<&'static str> {
    Some(match token {
        "c" => "flag_cy",
        "nc" => "flag_nc",
        "z" => "flag_z",
        "nz" => "flag_nz",
        _ => return None,
    })
}

/// Classifies `token` in the context of the mnemonic `head`.
///
/// `head` is `None` when `token` is itself the mnemonic.
#[must_use]
pub fn classify(head: Option<&str>, token: &str) -> Canonical {
    let lower = token.to_lowercase();
    let canonical = |class, body: &str| Canonical {
        class,
        body: body.to_owned(),
    };

    if lower.starts_with("illegal") {
        return canonical(TokenClass::Illegal, "illegal");
    }
    if head.is_some_and(is_control_flow) {
        if let Some(body) = condition_alias(&lower) {
            return canonical(TokenClass::Condition, body);
        }
    }
    if let Some(body) = placeholder_alias(&lower) {
        return canonical(TokenClass::Immediate, body);
    }
    if let Some(vector) = lower.strip_prefix('$') {
        return canonical(TokenClass::Vector, &format!("vec_{vector}"));
    }
    if head.is_some() && REGISTERS.contains(&lower.as_str()) {
        return canonical(TokenClass::Register, &lower);
    }
    if head.is_some() && lower.len() == 1 && lower.as_bytes()[0].is_ascii_digit() {
        return canonical(TokenClass::BitIndex, &lower);
    }
    Canonical {
        class: TokenClass::Other,
        body: lower,
    }
}

fn is_symbol_char(ch: char) -> bool {
    ch == '_' || ch.is_ascii_lowercase() || ch.is_ascii_digit()
}

/// Maps one token to its keyword.
///
/// `head` is the enclosing mnemonic (`None` for the mnemonic itself), `immediate` is the
/// operand's immediate flag, and `prefixed` says whether the instruction is on the `0xcb` page.
pub fn canonicalize(
    head: Option<&str>,
    token: &str,
    immediate: bool,
    prefixed: bool,
) -> Result<Keyword, VocabularyMiss> {
    let miss = |reason| VocabularyMiss {
        token: token.to_owned(),
        reason,
    };

    let Canonical { class, body } = classify(head, token);
    if body.is_empty() {
        return Err(miss(MissReason::Empty));
    }
    if let Some(ch) = body.chars().find(|&ch| !is_symbol_char(ch)) {
        return Err(miss(MissReason::IllegalCharacter(ch)));
    }
    if class == TokenClass::BitIndex && !prefixed {
        return Err(miss(MissReason::BitIndexOutsidePrefixedPage));
    }

    let body = if immediate {
        body
    } else {
        format!("{DEREF_MARKER}{body}")
    };
    Keyword::from_body(&body)
        .ok_or_else(|| miss(MissReason::Unknown(format!("{KEYWORD_PREFIX}{body}"))))
}

/// The mnemonic with an `i` suffix when any operand post-increments and a `d` suffix when any
/// operand post-decrements, lowercased.
#[must_use]
pub fn suffixed_mnemonic(spec: &InstructionSpec) -> String {
    let mut mnemonic = spec.head();
    if spec.operands.iter().any(|op| op.increment) {
        mnemonic.push('i');
    }
    if spec.operands.iter().any(|op| op.decrement) {
        mnemonic.push('d');
    }
    mnemonic
}

/// A keyword sequence padded to [`KEYWORD_SLOTS`] with [`Keyword::Nil`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeywordSeq {
    slots: [Keyword; KEYWORD_SLOTS],
    len: usize,
}

impl KeywordSeq {
    /// Builds a sequence from real keywords. Returns `None` if they do not fit.
    #[must_use]
    pub fn from_words(words: &[Keyword]) -> Option<Self> {
        if words.len() > KEYWORD_SLOTS {
            return None;
        }
        let mut slots = [Keyword::Nil; KEYWORD_SLOTS];
        slots[..words.len()].copy_from_slice(words);
        Some(Self {
            slots,
            len: words.len(),
        })
    }

    /// The real keywords, without padding.
    #[must_use]
    pub fn words(&self) -> &[Keyword] {
        &self.slots[..self.len]
    }

    /// All slots, padding included.
    #[must_use]
    pub fn slots(&self) -> &[Keyword; KEYWORD_SLOTS] {
        &self.slots
    }

    /// Number of real keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no real keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The mnemonic keyword.
    #[must_use]
    pub fn head(&self) -> Keyword {
        self.slots[0]
    }
}

impl fmt::Display for KeywordSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words().iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}

/// Canonical keywords for a whole instruction: the (suffixed) mnemonic, then each operand in
/// order.
pub fn instruction_keywords(spec: &InstructionSpec) -> Result<KeywordSeq, GenError> {
    let opcode = spec.opcode;
    let len = spec.operands.len() + 1;
    if len > KEYWORD_SLOTS {
        return Err(GenError::CapacityOverflow {
            opcode,
            slot: SlotKind::Keywords,
            len,
            capacity: KEYWORD_SLOTS,
        });
    }

    let prefixed = opcode.page.is_prefixed();
    let head = spec.head();
    let head = head.as_str();
    let vocabulary_miss = |miss| GenError::VocabularyMiss { opcode, miss };

    let mut slots = [Keyword::Nil; KEYWORD_SLOTS];
    slots[0] =
        canonicalize(None, &suffixed_mnemonic(spec), true, prefixed).map_err(vocabulary_miss)?;
    for (slot, operand) in slots[1..].iter_mut().zip(&spec.operands) {
        *slot = canonicalize(Some(head), &operand.name, operand.immediate, prefixed)
            .map_err(vocabulary_miss)?;
    }
    Ok(KeywordSeq { slots, len })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::schema::{FlagMap, OpcodeRef, OperandSpec};

    fn spec(opcode: OpcodeRef, mnemonic: &str, operands: Vec<OperandSpec>) -> InstructionSpec {
        InstructionSpec {
            opcode,
            mnemonic: mnemonic.to_owned(),
            bytes: 1,
            cycles: vec![4],
            operands,
            immediate: true,
            flags: FlagMap::UNAFFECTED,
        }
    }

    #[test]
    fn vocabulary_is_closed_and_unambiguous() {
        let bodies: HashSet<&str> = Keyword::ALL.iter().map(|k| k.body()).collect();
        assert_eq!(bodies.len(), Keyword::ALL.len());
        let variants: HashSet<&str> = Keyword::ALL.iter().map(|k| k.variant_name()).collect();
        assert_eq!(variants.len(), Keyword::ALL.len());
        assert_eq!(Keyword::ALL[0], Keyword::Nil);
        for &keyword in Keyword::ALL {
            assert!(keyword.body().chars().all(is_symbol_char), "{keyword:?}");
            assert_eq!(Keyword::from_symbol(&keyword.symbol()), Some(keyword));
        }
    }

    #[test]
    fn carry_token_depends_on_the_mnemonic() {
        let condition = canonicalize(Some("jp"), "C", true, false).unwrap();
        let register = canonicalize(Some("add"), "C", true, false).unwrap();
        assert_eq!(condition, Keyword::FlagCy);
        assert_eq!(register, Keyword::C);
        assert_ne!(condition.symbol(), register.symbol());

        for head in CONTROL_FLOW_HEADS {
            assert_eq!(
                canonicalize(Some(head), "NZ", true, false),
                Ok(Keyword::FlagNz)
            );
            assert_eq!(canonicalize(Some(head), "z", true, false), Ok(Keyword::FlagZ));
            assert_eq!(canonicalize(Some(head), "nc", true, false), Ok(Keyword::FlagNc));
        }
        assert_eq!(
            classify(Some("JR"), "c").class,
            TokenClass::Condition,
            "heads match in any case"
        );
    }

    #[test]
    fn placeholders_collapse_by_width() {
        for token in ["d8", "n8", "a8", "N8"] {
            assert_eq!(canonicalize(Some("ld"), token, true, false), Ok(Keyword::U8));
        }
        for token in ["d16", "n16", "a16"] {
            assert_eq!(canonicalize(Some("ld"), token, true, false), Ok(Keyword::U16));
        }
        for token in ["r8", "e8"] {
            assert_eq!(canonicalize(Some("jr"), token, true, false), Ok(Keyword::I8));
        }
        assert_eq!(canonicalize(Some("ld"), "a16", false, false), Ok(Keyword::DerefU16));
        assert_eq!(canonicalize(Some("ldh"), "a8", false, false), Ok(Keyword::DerefU8));
    }

    #[test]
    fn deref_marks_memory_operands() {
        let direct = canonicalize(Some("inc"), "A", true, false).unwrap();
        let indirect = canonicalize(Some("inc"), "A", false, false).unwrap();
        assert_eq!(direct, Keyword::A);
        assert_eq!(indirect, Keyword::DerefA);
        assert_eq!(indirect.symbol(), "keyword_deref_a");
        assert_eq!(
            indirect.body().strip_prefix(DEREF_MARKER),
            Some(direct.body())
        );
    }

    #[test]
    fn illegal_mnemonics_fold_to_one_keyword() {
        for token in ["illegal_d3", "ILLEGAL_FD", "illegal"] {
            assert_eq!(canonicalize(None, token, true, false), Ok(Keyword::Illegal));
        }
    }

    #[test]
    fn restart_vectors_become_symbols() {
        assert_eq!(canonicalize(Some("rst"), "$38", true, false), Ok(Keyword::Vec38));
        assert_eq!(canonicalize(Some("rst"), "$00", true, false), Ok(Keyword::Vec00));
        let miss = canonicalize(Some("rst"), "$40", true, false).unwrap_err();
        assert_eq!(miss.reason, MissReason::Unknown("keyword_vec_40".into()));
    }

    #[test]
    fn vocabulary_misses_are_reported() {
        let miss = canonicalize(Some("ld"), "SP+e8", true, false).unwrap_err();
        assert_eq!(miss.token, "SP+e8");
        assert_eq!(miss.reason, MissReason::IllegalCharacter('+'));

        let miss = canonicalize(Some("ld"), "", true, false).unwrap_err();
        assert_eq!(miss.reason, MissReason::Empty);

        let miss = canonicalize(None, "mul", true, false).unwrap_err();
        assert_eq!(miss.reason, MissReason::Unknown("keyword_mul".into()));

        let miss = canonicalize(Some("jp"), "c", false, false).unwrap_err();
        assert_eq!(miss.reason, MissReason::Unknown("keyword_deref_flag_cy".into()));
    }

    #[test]
    fn bit_numbers_only_exist_on_the_prefixed_page() {
        assert_eq!(canonicalize(Some("bit"), "7", true, true), Ok(Keyword::Bit7));
        let miss = canonicalize(Some("bit"), "7", true, false).unwrap_err();
        assert_eq!(miss.reason, MissReason::BitIndexOutsidePrefixedPage);
    }

    #[test]
    fn increment_and_decrement_suffix_the_mnemonic() {
        let mut hl_inc = OperandSpec::new("HL", false);
        hl_inc.increment = true;
        let ld = spec(
            OpcodeRef::unprefixed(0x2a),
            "LD",
            vec![OperandSpec::new("A", true), hl_inc],
        );
        assert_eq!(suffixed_mnemonic(&ld), "ldi");
        let seq = instruction_keywords(&ld).unwrap();
        assert_eq!(seq.words(), &[Keyword::Ldi, Keyword::A, Keyword::DerefHl]);

        let mut hl_dec = OperandSpec::new("HL", false);
        hl_dec.decrement = true;
        let ld = spec(
            OpcodeRef::unprefixed(0x32),
            "LD",
            vec![hl_dec, OperandSpec::new("A", true)],
        );
        assert_eq!(
            instruction_keywords(&ld).unwrap().words(),
            &[Keyword::Ldd, Keyword::DerefHl, Keyword::A]
        );
    }

    #[test]
    fn sequences_are_padded_with_nil() {
        let nop = spec(OpcodeRef::unprefixed(0x00), "NOP", vec![]);
        let seq = instruction_keywords(&nop).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(
            seq.slots(),
            &[Keyword::Nop, Keyword::Nil, Keyword::Nil, Keyword::Nil]
        );
        assert_eq!(seq.to_string(), "keyword_nop");
    }

    #[test]
    fn too_many_operands_overflow_the_keyword_slots() {
        let operands = vec![OperandSpec::new("A", true); 4];
        let wide = spec(OpcodeRef::unprefixed(0x01), "LD", operands);
        let err = instruction_keywords(&wide).unwrap_err();
        assert!(
            matches!(
                err,
                GenError::CapacityOverflow {
                    slot: SlotKind::Keywords,
                    len: 5,
                    capacity: KEYWORD_SLOTS,
                    ..
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn operand_misses_name_the_opcode() {
        let bad = spec(OpcodeRef::cb(0x10), "RL", vec![OperandSpec::new("(HL)", false)]);
        let err = instruction_keywords(&bad).unwrap_err();
        assert_eq!(
            err.to_string(),
            "0xcb 0x10: token \"(HL)\" has no keyword: character '(' cannot appear in a keyword"
        );
    }

    proptest! {
        #[test]
        fn canonicalize_never_panics(
            head in proptest::option::of("[a-zA-Z]{0,5}"),
            token in "\\PC{0,8}",
            immediate: bool,
            prefixed: bool,
        ) {
            let _ = canonicalize(head.as_deref(), &token, immediate, prefixed);
        }

        #[test]
        fn illegal_prefix_always_folds(
            suffix in "[_a-zA-Z0-9]{0,6}",
            head in proptest::option::of("(jp|add|ld)"),
        ) {
            let token = format!("illegal{suffix}");
            prop_assert_eq!(
                canonicalize(head.as_deref(), &token, true, false),
                Ok(Keyword::Illegal)
            );
        }

        #[test]
        fn deref_differs_only_by_marker(
            index in 0usize..REGISTERS.len(),
            head in "(ld|add|inc|push)",
        ) {
            let token = REGISTERS[index].to_uppercase();
            let direct = canonicalize(Some(head.as_str()), &token, true, false).unwrap();
            let indirect = canonicalize(Some(head.as_str()), &token, false, false).unwrap();
            prop_assert_ne!(direct, indirect);
            prop_assert_eq!(indirect.body(), format!("{DEREF_MARKER}{}", direct.body()));
        }
    }
}
