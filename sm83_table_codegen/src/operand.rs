// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operand normalization into fixed-capacity slots.

use crate::schema::OperandSpec;

/// Bytes in a normalized operand name.
pub const OPERAND_NAME_LEN: usize = 4;

/// Largest operand-slot capacity any profile may request.
pub const MAX_OPERAND_SLOTS: usize = 3;

/// One operand in its fixed table shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NormalizedOperand {
    /// Lowercased name, zero padded.
    pub name: [u8; OPERAND_NAME_LEN],
    /// Copied verbatim from the schema.
    pub immediate: bool,
    /// Post-increment addressing.
    pub increment: bool,
    /// Post-decrement addressing.
    pub decrement: bool,
    /// Inline value width in bytes.
    pub bytes: u8,
}

impl NormalizedOperand {
    /// The sentinel that pads unused slots.
    pub const EMPTY: Self = Self {
        name: [0; OPERAND_NAME_LEN],
        immediate: false,
        increment: false,
        decrement: false,
        bytes: 0,
    };

    /// Normalizes one schema operand.
    ///
    /// Names longer than [`OPERAND_NAME_LEN`] bytes are cut at the last character boundary that
    /// fits. The full name still reaches the keyword canonicalizer.
    #[must_use]
    pub fn from_spec(spec: &OperandSpec) -> Self {
        let lower = spec.name.to_lowercase();
        let mut end = lower.len().min(OPERAND_NAME_LEN);
        while !lower.is_char_boundary(end) {
            end -= 1;
        }
        if end < lower.len() {
            log::debug!("operand name {:?} truncated to {:?}", spec.name, &lower[..end]);
        }

        let mut name = [0; OPERAND_NAME_LEN];
        name[..end].copy_from_slice(&lower.as_bytes()[..end]);
        Self {
            name,
            immediate: spec.immediate,
            increment: spec.increment,
            decrement: spec.decrement,
            bytes: spec.bytes,
        }
    }

    /// The name without its zero padding.
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

/// The operands declared by a record do not fit in the available slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotOverflow {
    /// Operands declared.
    pub len: usize,
    /// Slots available.
    pub capacity: usize,
}

/// A row's operand slots, padded with [`NormalizedOperand::EMPTY`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperandSlots {
    slots: [NormalizedOperand; MAX_OPERAND_SLOTS],
    capacity: usize,
    len: usize,
}

impl OperandSlots {
    /// All slots up to the row capacity, padding included.
    #[must_use]
    pub fn as_slice(&self) -> &[NormalizedOperand] {
        &self.slots[..self.capacity]
    }

    /// Only the declared operands.
    #[must_use]
    pub fn operands(&self) -> &[NormalizedOperand] {
        &self.slots[..self.len]
    }

    /// Number of declared operands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no operand is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the row.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Normalizes `specs` in order into `capacity` slots.
///
/// `capacity` is clamped to [`MAX_OPERAND_SLOTS`]. More operands than slots is an error; nothing
/// is dropped.
pub fn normalize_operands(
    specs: &[OperandSpec],
    capacity: usize,
) -> Result<OperandSlots, SlotOverflow> {
    let capacity = capacity.min(MAX_OPERAND_SLOTS);
    if specs.len() > capacity {
        return Err(SlotOverflow {
            len: specs.len(),
            capacity,
        });
    }

    let mut slots = [NormalizedOperand::EMPTY; MAX_OPERAND_SLOTS];
    for (slot, spec) in slots.iter_mut().zip(specs) {
        *slot = NormalizedOperand::from_spec(spec);
    }
    Ok(OperandSlots {
        slots,
        capacity,
        len: specs.len(),
    })
}
