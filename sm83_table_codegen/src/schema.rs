// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Schema loading.
//!
//! The schema is the `gb-opcodes` JSON document: an `unprefixed` map and an optional
//! `cbprefixed` map, each keyed by `"0xNN"` strings. Records are deserialized one at a time so
//! that every shape error names its opcode, and every later stage sees a fully typed
//! [`InstructionSpec`] with no optional fields left.
//!
//! The `cbprefixed` map is only validated when asked for through [`Schema::cbprefixed`].

use core::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};

use crate::error::{GenError, SlotKind};
use crate::keyword::{self, TokenClass};

/// Number of opcodes on one page.
pub const PAGE_SIZE: usize = 256;

/// Number of cycle slots per row: `[taken, not-taken]`.
pub const CYCLE_SLOTS: usize = 2;

/// An opcode page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Page {
    /// Single-byte opcodes.
    Unprefixed,
    /// Opcodes reached through the `0xcb` prefix byte.
    CbPrefixed,
}

impl Page {
    /// The schema key for this page.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Unprefixed => "unprefixed",
            Self::CbPrefixed => "cbprefixed",
        }
    }

    /// Returns `true` for the `0xcb` page.
    #[must_use]
    pub const fn is_prefixed(self) -> bool {
        matches!(self, Self::CbPrefixed)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An opcode byte together with its page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpcodeRef {
    /// Page the byte belongs to.
    pub page: Page,
    /// Opcode byte.
    pub byte: u8,
}

impl OpcodeRef {
    /// An unprefixed opcode.
    #[must_use]
    pub const fn unprefixed(byte: u8) -> Self {
        Self {
            page: Page::Unprefixed,
            byte,
        }
    }

    /// A `0xcb`-prefixed opcode.
    #[must_use]
    pub const fn cb(byte: u8) -> Self {
        Self {
            page: Page::CbPrefixed,
            byte,
        }
    }
}

impl fmt::Display for OpcodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Page::Unprefixed => write!(f, "0x{:02x}", self.byte),
            Page::CbPrefixed => write!(f, "0xcb 0x{:02x}", self.byte),
        }
    }
}

/// The Z/N/H/C flag registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flag {
    /// Zero.
    Z,
    /// Subtract.
    N,
    /// Half carry.
    H,
    /// Carry.
    C,
}

/// What an instruction does to one flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagEffect {
    /// Left unchanged (`-`).
    Unaffected,
    /// Always cleared (`0`).
    Reset,
    /// Always set (`1`).
    Set,
    /// Set from the result, as the named flag.
    Affected(Flag),
}

impl FlagEffect {
    /// Serialized character for [`FlagEffect::Unaffected`]. No other effect uses it.
    pub const UNAFFECTED: char = '-';

    /// Parses a schema flag value (`-`, `0`, `1`, `Z`, `N`, `H`, `C`; letters in either case).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Some(match ch.to_ascii_lowercase() {
            Self::UNAFFECTED => Self::Unaffected,
            '0' => Self::Reset,
            '1' => Self::Set,
            'z' => Self::Affected(Flag::Z),
            'n' => Self::Affected(Flag::N),
            'h' => Self::Affected(Flag::H),
            'c' => Self::Affected(Flag::C),
            _ => return None,
        })
    }

    /// The single character written into the generated table.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Unaffected => Self::UNAFFECTED,
            Self::Reset => '0',
            Self::Set => '1',
            Self::Affected(Flag::Z) => 'z',
            Self::Affected(Flag::N) => 'n',
            Self::Affected(Flag::H) => 'h',
            Self::Affected(Flag::C) => 'c',
        }
    }
}

/// Flag effects in Z, N, H, C order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlagMap {
    /// Zero flag.
    pub z: FlagEffect,
    /// Subtract flag.
    pub n: FlagEffect,
    /// Half-carry flag.
    pub h: FlagEffect,
    /// Carry flag.
    pub c: FlagEffect,
}

impl FlagMap {
    /// No flag is touched.
    pub const UNAFFECTED: Self = Self {
        z: FlagEffect::Unaffected,
        n: FlagEffect::Unaffected,
        h: FlagEffect::Unaffected,
        c: FlagEffect::Unaffected,
    };

    /// Serialized characters in Z, N, H, C order.
    #[must_use]
    pub const fn chars(self) -> [char; 4] {
        [
            self.z.as_char(),
            self.n.as_char(),
            self.h.as_char(),
            self.c.as_char(),
        ]
    }
}

/// One operand of an instruction, as declared by the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperandSpec {
    /// Raw operand token (`"HL"`, `"n16"`, `"$38"`, ...). May be empty.
    pub name: String,
    /// `false` when the operand is a memory dereference.
    pub immediate: bool,
    /// Post-increment addressing (`[hl+]`).
    pub increment: bool,
    /// Post-decrement addressing (`[hl-]`).
    pub decrement: bool,
    /// Width of the inline value in bytes, `0` if none.
    pub bytes: u8,
}

impl OperandSpec {
    /// A plain register or immediate operand.
    #[must_use]
    pub fn new(name: &str, immediate: bool) -> Self {
        Self {
            name: name.to_owned(),
            immediate,
            increment: false,
            decrement: false,
            bytes: 0,
        }
    }
}

/// One fully validated instruction record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionSpec {
    /// Opcode byte and page.
    pub opcode: OpcodeRef,
    /// Raw mnemonic (`"LD"`, `"ILLEGAL_D3"`, ...).
    pub mnemonic: String,
    /// Encoded length in bytes, including any prefix byte.
    pub bytes: u8,
    /// One cycle count, or `[taken, not-taken]` for conditional control flow.
    pub cycles: Vec<u8>,
    /// Operands in source order.
    pub operands: Vec<OperandSpec>,
    /// Instruction-level immediate flag.
    pub immediate: bool,
    /// Flag effects.
    pub flags: FlagMap,
}

impl InstructionSpec {
    /// Lowercased mnemonic without any increment/decrement suffix.
    #[must_use]
    pub fn head(&self) -> String {
        self.mnemonic.to_lowercase()
    }

    /// Returns `true` if this is a `call`/`ret`/`jp`/`jr` whose first operand is a condition.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        let head = self.head();
        self.operands.first().is_some_and(|first| {
            keyword::classify(Some(head.as_str()), &first.name).class == TokenClass::Condition
        })
    }

    /// The declared cycles padded to `[taken, not-taken]`.
    ///
    /// Fails on an empty list, on more than [`CYCLE_SLOTS`] values, and on two values for an
    /// instruction that is not conditional control flow.
    pub fn cycle_pair(&self) -> Result<[u8; CYCLE_SLOTS], GenError> {
        let opcode = self.opcode;
        match self.cycles.len() {
            0 => Err(GenError::SchemaShape {
                opcode,
                detail: "cycle list is empty".into(),
            }),
            len if len > CYCLE_SLOTS => Err(GenError::CapacityOverflow {
                opcode,
                slot: SlotKind::Cycles,
                len,
                capacity: CYCLE_SLOTS,
            }),
            CYCLE_SLOTS if !self.is_conditional() => Err(GenError::SchemaShape {
                opcode,
                detail: format!(
                    "`{}` declares two cycle counts but is not a conditional call/ret/jp/jr",
                    self.head()
                ),
            }),
            len => {
                let mut pair = [0; CYCLE_SLOTS];
                pair[..len].copy_from_slice(&self.cycles);
                Ok(pair)
            }
        }
    }

    /// Sum of all declared cycles.
    pub fn total_cycles(&self) -> Result<u8, GenError> {
        let total: u32 = self.cycles.iter().copied().map(u32::from).sum();
        u8::try_from(total).map_err(|_| GenError::SchemaShape {
            opcode: self.opcode,
            detail: format!("total cycles {total} do not fit in a byte"),
        })
    }

    fn from_raw(opcode: OpcodeRef, raw: RawInstruction) -> Result<Self, GenError> {
        let shape = |detail: String| GenError::SchemaShape { opcode, detail };

        if raw.mnemonic.is_empty() {
            return Err(shape("mnemonic is empty".into()));
        }
        let bytes = match u8::try_from(raw.bytes) {
            Ok(0) => return Err(shape("byte length must be at least 1".into())),
            Ok(bytes) => bytes,
            Err(_) => {
                return Err(shape(format!(
                    "byte length {} does not fit in a byte",
                    raw.bytes
                )));
            }
        };
        let cycles = raw
            .cycles
            .iter()
            .map(|&c| {
                u8::try_from(c)
                    .map_err(|_| shape(format!("cycle count {c} does not fit in a byte")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut operands = Vec::with_capacity(raw.operands.len());
        for operand in raw.operands {
            if operand.increment && operand.decrement {
                return Err(shape(format!(
                    "operand {:?} is marked both increment and decrement",
                    operand.name
                )));
            }
            let width = operand.bytes.unwrap_or(0);
            let bytes = u8::try_from(width)
                .map_err(|_| shape(format!("operand {:?} is {width} bytes wide", operand.name)))?;
            operands.push(OperandSpec {
                name: operand.name,
                immediate: operand.immediate,
                increment: operand.increment,
                decrement: operand.decrement,
                bytes,
            });
        }

        let flag = |name: &str, raw: &str| {
            FlagEffect::parse(raw)
                .ok_or_else(|| shape(format!("flag {name} has unknown effect {raw:?}")))
        };
        let flags = FlagMap {
            z: flag("Z", &raw.flags.z)?,
            n: flag("N", &raw.flags.n)?,
            h: flag("H", &raw.flags.h)?,
            c: flag("C", &raw.flags.c)?,
        };

        let spec = Self {
            opcode,
            mnemonic: raw.mnemonic,
            bytes,
            cycles,
            operands,
            immediate: raw.immediate,
            flags,
        };
        spec.cycle_pair()?;
        spec.total_cycles()?;
        Ok(spec)
    }
}

/// All 256 instructions of one page, indexed by opcode byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpcodePage {
    page: Page,
    entries: Vec<InstructionSpec>,
}

impl OpcodePage {
    /// Which page this is.
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// The instruction for `byte`.
    #[must_use]
    pub fn get(&self, byte: u8) -> &InstructionSpec {
        &self.entries[usize::from(byte)]
    }

    /// Instructions in ascending opcode order.
    pub fn iter(&self) -> impl Iterator<Item = &InstructionSpec> {
        self.entries.iter()
    }

    fn from_raw(page: Page, raw: &RawPage) -> Result<Self, GenError> {
        let mut slots: Vec<Option<InstructionSpec>> = vec![None; PAGE_SIZE];
        for (key, value) in &raw.0 {
            let Some(byte) = parse_opcode_key(key) else {
                return Err(GenError::BadOpcodeKey {
                    page,
                    key: key.clone(),
                });
            };
            let opcode = OpcodeRef { page, byte };
            let slot = &mut slots[usize::from(byte)];
            if slot.is_some() {
                return Err(GenError::DuplicateOpcode { opcode });
            }
            let record =
                RawInstruction::deserialize(value).map_err(|err| GenError::SchemaShape {
                    opcode,
                    detail: err.to_string(),
                })?;
            *slot = Some(InstructionSpec::from_raw(opcode, record)?);
        }

        let entries = (0..=u8::MAX)
            .zip(slots)
            .map(|(byte, slot)| {
                slot.ok_or(GenError::MissingOpcode {
                    opcode: OpcodeRef { page, byte },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("loaded {} {page} opcodes", entries.len());
        Ok(Self { page, entries })
    }
}

/// A loaded schema. The unprefixed page is validated on load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    /// The single-byte page.
    pub unprefixed: OpcodePage,
    cbprefixed: Option<RawPage>,
}

impl Schema {
    /// Reads and validates the schema at `path`.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let json = fs::read_to_string(path).map_err(|source| GenError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parses and validates a schema document.
    pub fn from_json(json: &str) -> Result<Self, GenError> {
        let raw: RawSchema = serde_json::from_str(json)?;
        let unprefixed = OpcodePage::from_raw(Page::Unprefixed, &raw.unprefixed)?;
        Ok(Self {
            unprefixed,
            cbprefixed: raw.cbprefixed,
        })
    }

    /// Returns `true` if the document has a `cbprefixed` map.
    #[must_use]
    pub fn has_cbprefixed(&self) -> bool {
        self.cbprefixed.is_some()
    }

    /// Validates and returns the `0xcb` page, or `None` if the document has none.
    pub fn cbprefixed(&self) -> Result<Option<OpcodePage>, GenError> {
        self.cbprefixed
            .as_ref()
            .map(|raw| OpcodePage::from_raw(Page::CbPrefixed, raw))
            .transpose()
    }
}

/// Parses `0xNN` (prefix in either case, exactly two hex digits).
fn parse_opcode_key(key: &str) -> Option<u8> {
    let digits = key.strip_prefix("0x").or_else(|| key.strip_prefix("0X"))?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    unprefixed: RawPage,
    #[serde(default)]
    cbprefixed: Option<RawPage>,
}

/// Page entries in document order, duplicates kept so they can be reported.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RawPage(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawPage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PageVisitor;

        impl<'de> Visitor<'de> for PageVisitor {
            type Value = RawPage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from opcode keys to instruction records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawPage, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(PAGE_SIZE));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RawPage(entries))
            }
        }

        deserializer.deserialize_map(PageVisitor)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInstruction {
    mnemonic: String,
    bytes: u32,
    cycles: Vec<u32>,
    operands: Vec<RawOperand>,
    immediate: bool,
    flags: RawFlags,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOperand {
    #[serde(default)]
    name: String,
    #[serde(default)]
    bytes: Option<u32>,
    immediate: bool,
    #[serde(default)]
    increment: bool,
    #[serde(default)]
    decrement: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFlags {
    #[serde(rename = "Z")]
    z: String,
    #[serde(rename = "N")]
    n: String,
    #[serde(rename = "H")]
    h: String,
    #[serde(rename = "C")]
    c: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{filler, record, schema_json, shipped_schema};

    #[test]
    fn opcode_keys_are_strict() {
        assert_eq!(parse_opcode_key("0x3e"), Some(0x3e));
        assert_eq!(parse_opcode_key("0X3E"), Some(0x3e));
        assert_eq!(parse_opcode_key("0x3"), None);
        assert_eq!(parse_opcode_key("0x03e"), None);
        assert_eq!(parse_opcode_key("3e"), None);
        assert_eq!(parse_opcode_key("0x+3"), None);
    }

    #[test]
    fn flag_effects_parse_case_insensitively() {
        assert_eq!(FlagEffect::parse("-"), Some(FlagEffect::Unaffected));
        assert_eq!(FlagEffect::parse("0"), Some(FlagEffect::Reset));
        assert_eq!(FlagEffect::parse("1"), Some(FlagEffect::Set));
        assert_eq!(FlagEffect::parse("H"), Some(FlagEffect::Affected(Flag::H)));
        assert_eq!(FlagEffect::parse("c"), Some(FlagEffect::Affected(Flag::C)));
        assert_eq!(FlagEffect::parse(""), None);
        assert_eq!(FlagEffect::parse("ZZ"), None);
        assert_eq!(FlagEffect::parse("x"), None);
    }

    #[test]
    fn unaffected_char_is_reserved() {
        let literals = [
            FlagEffect::Reset,
            FlagEffect::Set,
            FlagEffect::Affected(Flag::Z),
            FlagEffect::Affected(Flag::N),
            FlagEffect::Affected(Flag::H),
            FlagEffect::Affected(Flag::C),
        ];
        for effect in literals {
            assert_ne!(effect.as_char(), FlagEffect::UNAFFECTED, "{effect:?}");
        }
    }

    #[test]
    fn shipped_schema_loads_both_pages() {
        let schema = shipped_schema();
        let cb = schema
            .cbprefixed()
            .expect("valid cbprefixed page")
            .expect("cbprefixed page");
        assert_eq!(schema.unprefixed.iter().count(), PAGE_SIZE);
        assert_eq!(cb.iter().count(), PAGE_SIZE);

        let jr_nz = schema.unprefixed.get(0x20);
        assert_eq!(jr_nz.head(), "jr");
        assert_eq!(jr_nz.cycles, vec![12, 8]);
        assert!(jr_nz.is_conditional());

        let bit = cb.get(0x46);
        assert_eq!(bit.opcode, OpcodeRef::cb(0x46));
        assert_eq!(bit.operands[1], OperandSpec::new("HL", false));
    }

    #[test]
    fn missing_opcode_names_the_first_gap() {
        let mut json = schema_json(&[], None);
        json = json.replace(&format!("\"0x41\": {},", filler(0x41)), "");
        let err = Schema::from_json(&json).unwrap_err();
        let gap = OpcodeRef::unprefixed(0x41);
        assert!(
            matches!(err, GenError::MissingOpcode { opcode } if opcode == gap),
            "{err}"
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let json = schema_json(&[], None).replacen(
            "\"0x00\":",
            &format!("\"0x00\": {}, \"0x00\":", filler(0x00)),
            1,
        );
        let err = Schema::from_json(&json).unwrap_err();
        assert!(matches!(err, GenError::DuplicateOpcode { .. }), "{err}");

        let json = schema_json(&[], None).replacen(
            "\"0x0a\":",
            &format!("\"0x0A\": {}, \"0x0a\":", filler(0x0a)),
            1,
        );
        let err = Schema::from_json(&json).unwrap_err();
        assert!(
            matches!(err, GenError::DuplicateOpcode { opcode } if opcode.byte == 0x0a),
            "{err}"
        );
    }

    #[test]
    fn malformed_keys_are_rejected() {
        let json = schema_json(&[], None).replacen("\"0x00\":", "\"0x0\":", 1);
        let err = Schema::from_json(&json).unwrap_err();
        assert!(matches!(err, GenError::BadOpcodeKey { ref key, .. } if key == "0x0"), "{err}");
    }

    #[test]
    fn record_shape_errors_name_the_opcode() {
        let missing_flag = r#"{"mnemonic": "NOP", "bytes": 1, "cycles": [4], "operands": [], "immediate": true, "flags": {"Z": "-", "N": "-", "H": "-"}}"#;
        let err = Schema::from_json(&schema_json(&[(0x10, missing_flag)], None)).unwrap_err();
        let stop = OpcodeRef::unprefixed(0x10);
        assert!(
            matches!(err, GenError::SchemaShape { opcode, .. } if opcode == stop),
            "{err}"
        );

        let extra_field = r#"{"mnemonic": "NOP", "bytes": 1, "cycles": [4], "operands": [], "immediate": true, "flags": {"Z": "-", "N": "-", "H": "-", "C": "-"}, "comment": "x"}"#;
        let err = Schema::from_json(&schema_json(&[(0x11, extra_field)], None)).unwrap_err();
        assert!(matches!(err, GenError::SchemaShape { .. }), "{err}");

        let bad_flag = r#"{"mnemonic": "NOP", "bytes": 1, "cycles": [4], "operands": [], "immediate": true, "flags": {"Z": "?", "N": "-", "H": "-", "C": "-"}}"#;
        let err = Schema::from_json(&schema_json(&[(0x12, bad_flag)], None)).unwrap_err();
        assert!(err.to_string().contains("flag Z"), "{err}");

        let zero_length = r#"{"mnemonic": "NOP", "bytes": 0, "cycles": [4], "operands": [], "immediate": true, "flags": {"Z": "-", "N": "-", "H": "-", "C": "-"}}"#;
        let err = Schema::from_json(&schema_json(&[(0x13, zero_length)], None)).unwrap_err();
        assert!(matches!(err, GenError::SchemaShape { .. }), "{err}");
    }

    #[test]
    fn cycle_lists_are_checked() {
        let empty = record("NOP", 1, "[]", "[]");
        let err = Schema::from_json(&schema_json(&[(0x00, empty.as_str())], None)).unwrap_err();
        assert!(matches!(err, GenError::SchemaShape { .. }), "{err}");

        let jr_operands =
            r#"[{"name": "NZ", "immediate": true}, {"name": "e8", "bytes": 1, "immediate": true}]"#;
        let three = record("JR", 2, "[12, 8, 4]", jr_operands);
        let err = Schema::from_json(&schema_json(&[(0x20, three.as_str())], None)).unwrap_err();
        assert!(
            matches!(
                err,
                GenError::CapacityOverflow {
                    slot: SlotKind::Cycles,
                    len: 3,
                    capacity: 2,
                    ..
                }
            ),
            "{err}"
        );

        let add_operands =
            r#"[{"name": "A", "immediate": true}, {"name": "C", "immediate": true}]"#;
        let unconditional = record("ADD", 1, "[8, 4]", add_operands);
        let json = schema_json(&[(0x81, unconditional.as_str())], None);
        let err = Schema::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("two cycle counts"), "{err}");

        let wide = record("JR", 2, "[200, 100]", jr_operands);
        let err = Schema::from_json(&schema_json(&[(0x20, wide.as_str())], None)).unwrap_err();
        assert!(err.to_string().contains("total cycles 300"), "{err}");

        let huge = record("NOP", 1, "[256]", "[]");
        let err = Schema::from_json(&schema_json(&[(0x00, huge.as_str())], None)).unwrap_err();
        assert!(err.to_string().contains("cycle count 256"), "{err}");
    }

    #[test]
    fn cbprefixed_page_is_optional() {
        let schema = Schema::from_json(&schema_json(&[], None)).unwrap();
        assert!(!schema.has_cbprefixed());
        assert!(schema.cbprefixed().unwrap().is_none());
        assert_eq!(schema.unprefixed.page(), Page::Unprefixed);
    }

    #[test]
    fn cbprefixed_page_is_validated_on_demand() {
        let bad_flag = r#"{"mnemonic": "RLC", "bytes": 2, "cycles": [8], "operands": [], "immediate": true, "flags": {"Z": "?", "N": "0", "H": "0", "C": "C"}}"#;
        let json = schema_json(&[], Some(&[(0x00, bad_flag)][..]));
        let schema = Schema::from_json(&json).expect("unprefixed page is valid");
        assert!(schema.has_cbprefixed());

        let err = schema.cbprefixed().unwrap_err();
        assert!(
            matches!(err, GenError::SchemaShape { opcode, .. } if opcode == OpcodeRef::cb(0x00)),
            "{err}"
        );
        assert!(err.to_string().contains("flag Z"), "{err}");

        let json = schema_json(&[], Some(&[][..])).replacen(
            r#""cbprefixed": {"0x00":"#,
            r#""cbprefixed": {"0x0":"#,
            1,
        );
        let schema = Schema::from_json(&json).expect("unprefixed page is valid");
        assert!(matches!(
            schema.cbprefixed(),
            Err(GenError::BadOpcodeKey {
                page: Page::CbPrefixed,
                ..
            })
        ));
    }

    #[test]
    fn load_reports_the_path() {
        let err = Schema::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"), "{err}");
    }
}
