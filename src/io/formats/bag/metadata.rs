// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed view of the bag header record.

use crate::Result;

use super::constants::fields;
use super::header::RecordHeader;

/// Summary fields carried by the bag header record.
///
/// All fields are optional: the decoder only requires `op` on the bag
/// header, and streaming never uses the index these fields point to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BagMetadata {
    /// Offset of the first index record
    pub index_pos: Option<u64>,
    /// Number of distinct connections
    pub conn_count: Option<u32>,
    /// Number of chunk records
    pub chunk_count: Option<u32>,
}

impl BagMetadata {
    /// Extract the summary fields, validating the width of those present.
    pub fn from_header(header: &RecordHeader) -> Result<Self> {
        Ok(Self {
            index_pos: header.get_u64(fields::INDEX_POS)?,
            conn_count: header.get_u32(fields::CONN_COUNT)?,
            chunk_count: header.get_u32(fields::CHUNK_COUNT)?,
        })
    }
}
