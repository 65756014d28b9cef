// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation settings.

use crate::error::GenError;
use crate::operand::MAX_OPERAND_SLOTS;

/// Smallest operand-slot capacity a profile may request.
pub const MIN_OPERAND_SLOTS: usize = 2;

/// How the `0xcb` page is laid out in the generated source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrefixedLayout {
    /// Only the unprefixed page is generated.
    Omit,
    /// `OPCODE_TABLE` and `CB_OPCODE_TABLE`, 256 rows each.
    Separate,
    /// One 512-row `OPCODE_TABLE`, indexed by `prefixed * 256 + byte`.
    Combined,
}

impl PrefixedLayout {
    /// Returns `true` if the `0xcb` page is compiled.
    #[must_use]
    pub const fn includes_prefixed(self) -> bool {
        !matches!(self, Self::Omit)
    }
}

/// Settings for one generation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    /// Operand slots per decode row.
    pub operand_slots: usize,
    /// Layout of the `0xcb` page.
    pub prefixed: PrefixedLayout,
    /// Whether the reverse encode table is generated.
    pub encode_table: bool,
}

impl Profile {
    /// Both pages, three operand slots, and the encode table.
    pub const FULL: Self = Self {
        operand_slots: 3,
        prefixed: PrefixedLayout::Separate,
        encode_table: true,
    };

    /// The unprefixed page only, in two operand slots, without an encode table.
    pub const COMPACT: Self = Self {
        operand_slots: 2,
        prefixed: PrefixedLayout::Omit,
        encode_table: false,
    };

    /// Checks that the profile describes a layout that can be generated.
    pub fn validate(&self) -> Result<(), GenError> {
        if !(MIN_OPERAND_SLOTS..=MAX_OPERAND_SLOTS).contains(&self.operand_slots) {
            return Err(GenError::Profile(format!(
                "operand_slots must be between {MIN_OPERAND_SLOTS} and {MAX_OPERAND_SLOTS}, got {}",
                self.operand_slots
            )));
        }
        Ok(())
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::FULL
    }
}
