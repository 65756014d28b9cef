// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory decode and encode tables.
//!
//! [`Tables::compile`] runs the whole pipeline over a loaded [`Schema`]: every instruction is
//! normalized and canonicalized into a [`DecodeRow`], encodable rows are projected into
//! [`EncodeRow`]s, and the two tables are cross-checked against each other. Nothing is rendered
//! until every check has passed.

use std::collections::HashMap;

use crate::error::{GenError, SlotKind};
use crate::keyword::{self, Keyword, KeywordSeq};
use crate::operand::{OperandSlots, SlotOverflow, normalize_operands};
use crate::profile::Profile;
use crate::schema::{
    CYCLE_SLOTS, FlagMap, InstructionSpec, OpcodePage, OpcodeRef, PAGE_SIZE, Page, Schema,
};

/// One row of the forward table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeRow {
    /// Opcode byte and page.
    pub opcode: OpcodeRef,
    /// Lowercased mnemonic with any `i`/`d` suffix.
    pub mnemonic: String,
    /// Encoded length in bytes.
    pub bytes: u8,
    /// Sum of the declared cycles.
    pub total_cycles: u8,
    /// `[taken, not-taken]`, zero padded.
    pub cycles: [u8; CYCLE_SLOTS],
    /// Normalized operands.
    pub operands: OperandSlots,
    /// Instruction-level immediate flag.
    pub immediate: bool,
    /// Flag effects.
    pub flags: FlagMap,
    /// Canonical keyword sequence.
    pub keywords: KeywordSeq,
}

impl DecodeRow {
    /// Builds the row for one instruction.
    pub fn build(spec: &InstructionSpec, operand_slots: usize) -> Result<Self, GenError> {
        let opcode = spec.opcode;
        let operands = normalize_operands(&spec.operands, operand_slots).map_err(
            |SlotOverflow { len, capacity }| GenError::CapacityOverflow {
                opcode,
                slot: SlotKind::Operands,
                len,
                capacity,
            },
        )?;
        let keywords = keyword::instruction_keywords(spec)?;

        Ok(Self {
            opcode,
            mnemonic: keyword::suffixed_mnemonic(spec),
            bytes: spec.bytes,
            total_cycles: spec.total_cycles()?,
            cycles: spec.cycle_pair()?,
            operands,
            immediate: spec.immediate,
            flags: spec.flags,
            keywords,
        })
    }

    /// Returns `true` for rows on the `0xcb` page.
    #[must_use]
    pub fn prefixed(&self) -> bool {
        self.opcode.page.is_prefixed()
    }

    /// Returns `true` if the row has an entry in the encode table.
    ///
    /// Every illegal opcode folds to the same keyword, so none of them can be encoded.
    #[must_use]
    pub fn is_encodable(&self) -> bool {
        self.keywords.head() != Keyword::Illegal
    }
}

/// One row of the reverse table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncodeRow {
    /// Canonical keyword sequence.
    pub keywords: KeywordSeq,
    /// Opcode the sequence encodes to.
    pub opcode: OpcodeRef,
}

impl EncodeRow {
    /// Returns `true` if the opcode needs the `0xcb` prefix.
    #[must_use]
    pub fn prefixed(&self) -> bool {
        self.opcode.page.is_prefixed()
    }
}

/// Cross-checked decode and encode tables.
#[derive(Clone, Debug)]
pub struct Tables {
    profile: Profile,
    unprefixed: Vec<DecodeRow>,
    cbprefixed: Option<Vec<DecodeRow>>,
    encode: Vec<EncodeRow>,
}

impl Tables {
    /// Compiles `schema` under `profile`.
    pub fn compile(schema: &Schema, profile: Profile) -> Result<Self, GenError> {
        profile.validate()?;

        let unprefixed = build_page(&schema.unprefixed, profile.operand_slots)?;
        let cbprefixed = if profile.prefixed.includes_prefixed() {
            let page = schema.cbprefixed()?.ok_or(GenError::MissingPage {
                page: Page::CbPrefixed,
            })?;
            Some(build_page(&page, profile.operand_slots)?)
        } else {
            None
        };

        let mut tables = Self {
            profile,
            unprefixed,
            cbprefixed,
            encode: Vec::new(),
        };
        if profile.encode_table {
            tables.encode = build_encode(tables.rows())?;
        }
        tables.cross_check()?;

        log::info!(
            "compiled {} decode rows and {} encode rows",
            tables.rows().count(),
            tables.encode.len()
        );
        Ok(tables)
    }

    /// The profile the tables were compiled under.
    #[must_use]
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// The 256 rows of `page`, if it was compiled.
    #[must_use]
    pub fn page(&self, page: Page) -> Option<&[DecodeRow]> {
        match page {
            Page::Unprefixed => Some(self.unprefixed.as_slice()),
            Page::CbPrefixed => self.cbprefixed.as_deref(),
        }
    }

    /// The decode row for `opcode`.
    #[must_use]
    pub fn decode(&self, opcode: OpcodeRef) -> Option<&DecodeRow> {
        self.page(opcode.page)?.get(usize::from(opcode.byte))
    }

    /// Every decode row, unprefixed page first.
    pub fn rows(&self) -> impl Iterator<Item = &DecodeRow> {
        self.unprefixed
            .iter()
            .chain(self.cbprefixed.iter().flatten())
    }

    /// The encode table in ascending (page, opcode) order. Empty unless the profile asks for it.
    #[must_use]
    pub fn encode(&self) -> &[EncodeRow] {
        &self.encode
    }

    /// Looks up the encode row for a keyword sequence (without padding).
    #[must_use]
    pub fn lookup(&self, words: &[Keyword]) -> Option<&EncodeRow> {
        let seq = KeywordSeq::from_words(words)?;
        self.encode.iter().find(|row| row.keywords == seq)
    }

    fn cross_check(&self) -> Result<(), GenError> {
        for page in [Page::Unprefixed, Page::CbPrefixed] {
            let Some(rows) = self.page(page) else {
                continue;
            };
            if rows.len() != PAGE_SIZE {
                return Err(GenError::MissingOpcode {
                    opcode: OpcodeRef {
                        page,
                        byte: u8::try_from(rows.len()).unwrap_or(u8::MAX),
                    },
                });
            }
            for (byte, row) in (0..=u8::MAX).zip(rows) {
                if row.opcode != (OpcodeRef { page, byte })
                    || row.operands.capacity() != self.profile.operand_slots
                {
                    return Err(GenError::TableMismatch { opcode: row.opcode });
                }
            }
        }

        for row in &self.encode {
            let matches = self.decode(row.opcode).is_some_and(|decode| {
                decode.is_encodable()
                    && decode.keywords == row.keywords
                    && decode.prefixed() == row.prefixed()
            });
            if !matches {
                return Err(GenError::TableMismatch { opcode: row.opcode });
            }
        }
        Ok(())
    }
}

fn build_page(page: &OpcodePage, operand_slots: usize) -> Result<Vec<DecodeRow>, GenError> {
    let mut rows: Vec<Option<DecodeRow>> = vec![None; PAGE_SIZE];
    for spec in page.iter() {
        rows[usize::from(spec.opcode.byte)] = Some(DecodeRow::build(spec, operand_slots)?);
    }
    let rows = (0..=u8::MAX)
        .zip(rows)
        .map(|(byte, row)| {
            row.ok_or(GenError::MissingOpcode {
                opcode: OpcodeRef {
                    page: page.page(),
                    byte,
                },
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("built {} {} decode rows", rows.len(), page.page());
    Ok(rows)
}

fn build_encode<'a>(
    rows: impl Iterator<Item = &'a DecodeRow>,
) -> Result<Vec<EncodeRow>, GenError> {
    let mut seen: HashMap<KeywordSeq, OpcodeRef> = HashMap::new();
    let mut encode = Vec::new();
    for row in rows.filter(|row| row.is_encodable()) {
        if let Some(&first) = seen.get(&row.keywords) {
            return Err(GenError::KeywordCollision {
                first,
                second: row.opcode,
                sequence: row.keywords.to_string(),
            });
        }
        seen.insert(row.keywords, row.opcode);
        encode.push(EncodeRow {
            keywords: row.keywords,
            opcode: row.opcode,
        });
    }
    Ok(encode)
}
