// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported while compiling the opcode schema.
//!
//! Every failure is fatal: generation either produces complete, cross-checked tables or nothing.
//! Errors raised for a single instruction name its opcode.

use core::fmt;
use std::io;
use std::path::PathBuf;

use crate::keyword::VocabularyMiss;
use crate::schema::{OpcodeRef, Page};

/// A fixed-capacity slot array in a table row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotKind {
    /// Operand slots (`Profile::operand_slots`).
    Operands,
    /// Keyword slots (always [`KEYWORD_SLOTS`](crate::keyword::KEYWORD_SLOTS)).
    Keywords,
    /// Cycle slots (`[taken, not-taken]`).
    Cycles,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operands => write!(f, "operands"),
            Self::Keywords => write!(f, "keywords"),
            Self::Cycles => write!(f, "cycle counts"),
        }
    }
}

/// An error that aborts table generation.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The schema document is not valid JSON or is missing its top-level maps.
    #[error("malformed schema document")]
    Json(#[from] serde_json::Error),
    /// The schema file could not be read.
    #[error("read {}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The profile needs a page the schema does not define.
    #[error("schema has no `{page}` opcode map")]
    MissingPage {
        /// The absent page.
        page: Page,
    },
    /// An opcode key is not `0x` followed by exactly two hex digits.
    #[error("{page}: opcode key {key:?} is not `0x` followed by two hex digits")]
    BadOpcodeKey {
        /// Page holding the key.
        page: Page,
        /// The raw key.
        key: String,
    },
    /// Two keys name the same opcode byte.
    #[error("{opcode}: opcode is defined more than once")]
    DuplicateOpcode {
        /// The repeated opcode.
        opcode: OpcodeRef,
    },
    /// A page has a gap.
    #[error("{opcode}: opcode is missing from the schema")]
    MissingOpcode {
        /// The first missing opcode.
        opcode: OpcodeRef,
    },
    /// A record is missing a field, has an unknown one, or holds an out-of-range value.
    #[error("{opcode}: {detail}")]
    SchemaShape {
        /// The offending opcode.
        opcode: OpcodeRef,
        /// What is wrong with the record.
        detail: String,
    },
    /// A record needs more slots than the row layout provides.
    #[error("{opcode}: {len} {slot} exceed the capacity of {capacity}")]
    CapacityOverflow {
        /// The offending opcode.
        opcode: OpcodeRef,
        /// Which slot array overflowed.
        slot: SlotKind,
        /// Number of entries the record needs.
        len: usize,
        /// Number of slots available.
        capacity: usize,
    },
    /// A mnemonic or operand token has no keyword.
    #[error("{opcode}: {miss}")]
    VocabularyMiss {
        /// The offending opcode.
        opcode: OpcodeRef,
        /// The token and the reason it was rejected.
        miss: VocabularyMiss,
    },
    /// Two encodable opcodes share a keyword sequence.
    #[error("{first} and {second} both encode as `{sequence}`")]
    KeywordCollision {
        /// The lower opcode.
        first: OpcodeRef,
        /// The higher opcode.
        second: OpcodeRef,
        /// The shared keyword sequence.
        sequence: String,
    },
    /// An encode row does not agree with the decode row it was derived from.
    #[error("{opcode}: encode row disagrees with its decode row")]
    TableMismatch {
        /// The opcode whose rows disagree.
        opcode: OpcodeRef,
    },
    /// The generation profile is not usable.
    #[error("invalid generation profile: {0}")]
    Profile(String),
}
