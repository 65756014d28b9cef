// Copyright 2026 the SM83 Table Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end conformance tests for `sm83_table_codegen` and `sm83_table`.
//!
//! The tests live in `tests/conformance.rs`; this crate has no API of its own.
