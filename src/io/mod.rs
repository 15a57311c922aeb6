// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer: the byte cursor over a blocking source and the format
//! decoders built on it.

pub mod cursor;
pub mod formats;

// Re-exports
pub use cursor::ByteCursor;
