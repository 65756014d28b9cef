// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SM83 decode and encode tables.
//!
//! This module is a small wrapper around the tables generated by the build script.

include!(concat!(env!("OUT_DIR"), "/opcodes_gen.rs"));

/// The byte that selects [`CB_OPCODE_TABLE`].
pub const CB_PREFIX: u8 = 0xCB;

/// Decodes a single-byte opcode.
#[must_use]
pub fn decode(byte: u8) -> &'static Opcode {
    &OPCODE_TABLE[usize::from(byte)]
}

/// Decodes the byte following a [`CB_PREFIX`].
#[must_use]
pub fn decode_cb(byte: u8) -> &'static Opcode {
    &CB_OPCODE_TABLE[usize::from(byte)]
}

/// Finds the opcode for a canonical keyword sequence (without `Nil` padding).
#[must_use]
pub fn encode(words: &[Keyword]) -> Option<&'static Encoding> {
    ENCODE_TABLE.iter().find(|e| e.words() == words)
}

impl Opcode {
    /// The declared operands.
    #[must_use]
    pub fn operands(&self) -> &[Operand] {
        &self.operands[..usize::from(self.num_operands)]
    }

    /// The canonical keywords, without padding.
    #[must_use]
    pub fn words(&self) -> &[Keyword] {
        &self.words[..usize::from(self.num_words)]
    }

    /// Returns `true` for the opcodes that have no instruction behind them.
    #[must_use]
    pub fn is_illegal(&self) -> bool {
        self.words[0] == Keyword::Illegal
    }

    /// Returns `true` for conditional `call`/`ret`/`jp`/`jr`.
    ///
    /// Condition keywords only follow a control-flow mnemonic.
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(
            self.words[1],
            Keyword::FlagCy | Keyword::FlagNc | Keyword::FlagZ | Keyword::FlagNz
        )
    }

    /// Cycles taken when the branch condition holds (`taken`) or not.
    ///
    /// Rows with a single declared count take the same time either way.
    #[must_use]
    pub const fn cycles_for(&self, taken: bool) -> u8 {
        if taken || self.cycles[1] == 0 {
            self.cycles[0]
        } else {
            self.cycles[1]
        }
    }

    /// The encode row that assembles back to this opcode.
    #[must_use]
    pub fn encoding(&self) -> Option<&'static Encoding> {
        encode(self.words()).filter(|e| e.code == self.code && e.prefixed == self.prefixed)
    }
}

impl Operand {
    /// The name without zero padding.
    #[must_use]
    pub fn name(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(OPERAND_NAME_LEN);
        core::str::from_utf8(&self.name[..end]).unwrap_or_default()
    }

    /// Returns `true` for the padding sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Encoding {
    /// The keywords, without padding.
    #[must_use]
    pub fn words(&self) -> &[Keyword] {
        &self.words[..usize::from(self.num_words)]
    }

    /// The prefix byte to emit before `code`, if any.
    #[must_use]
    pub const fn prefix(&self) -> Option<u8> {
        if self.prefixed { Some(CB_PREFIX) } else { None }
    }

    /// The decode row this encoding came from.
    #[must_use]
    pub fn opcode(&self) -> &'static Opcode {
        if self.prefixed {
            decode_cb(self.code)
        } else {
            decode(self.code)
        }
    }
}

impl Keyword {
    /// Looks a keyword up by its `keyword_*` symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.symbol() == symbol)
    }
}
