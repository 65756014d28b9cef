// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `sm83_table`: Game Boy SM83 decode and encode tables.
//!
//! The tables are compiled from `gb-opcodes/Opcodes.json` by `sm83_table_codegen` when this
//! crate is built. Decode by opcode byte with [`decode`] and [`decode_cb`]; assemble a canonical
//! keyword sequence back to its opcode with [`encode`].
//!
//! ```
//! use sm83_table::{Keyword, decode, encode};
//!
//! let ld = decode(0x3e);
//! assert_eq!(ld.mnemonic, "ld");
//! assert_eq!(ld.words(), &[Keyword::Ld, Keyword::A, Keyword::U8]);
//! assert_eq!(encode(ld.words()).map(|e| e.code), Some(0x3e));
//! ```

#![no_std]

pub mod opcode;

pub use opcode::{
    CB_OPCODE_TABLE, CB_PREFIX, ENCODE_TABLE, Encoding, Keyword, OPCODE_TABLE, Opcode,
    OpcodeFlags, Operand, decode, decode_cb, encode,
};
