// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Chunk record decoding.
//!
//! A chunk's data region is itself a run of records, restricted to
//! connection, message-data, index-data and chunk-info. Only uncompressed
//! chunks are decoded; the payload is streamed straight from the source
//! while the bytes consumed are counted against the declared length.

use std::io::Read;

use tracing::{trace, warn};

use crate::io::ByteCursor;
use crate::{BagError, Result};

use super::connection::{read_connection_record, ConnectionRegistry};
use super::constants::{fields, OpCode, COMPRESSION_NONE};
use super::header::RecordHeader;
use super::message::{read_message_record, MessageHandler};
use super::parser::ParseStats;

/// Decode a chunk record whose header has already been read.
///
/// Returns the bytes consumed after the header: the 4-byte payload length
/// plus the payload.
pub(crate) fn read_chunk_record<R, H>(
    cursor: &mut ByteCursor<R>,
    header: &RecordHeader,
    registry: &mut ConnectionRegistry,
    handler: &mut H,
    stats: &mut ParseStats,
) -> Result<u64>
where
    R: Read,
    H: MessageHandler + ?Sized,
{
    let compression = header.require_string(fields::COMPRESSION, "chunk")?;
    if compression != COMPRESSION_NONE {
        return Err(BagError::unsupported(format!(
            "chunk compression '{compression}'"
        )));
    }

    let payload_len = cursor.read_u32()? as u64;
    if let Some(size) = header.get_u32(fields::SIZE)? {
        if size as u64 != payload_len {
            warn!(
                size,
                payload_len, "uncompressed chunk size field disagrees with payload length"
            );
        }
    }
    trace!(payload_len, "decoding chunk");

    let mut consumed: u64 = 0;
    while consumed < payload_len {
        let header_len = cursor.read_u32()?;
        let nested = RecordHeader::read(cursor, header_len)?;
        consumed += 4 + header_len as u64;

        let op = nested.op()?;
        trace!(%op, "chunk record");
        consumed += match op {
            OpCode::Connection => {
                stats.connections += 1;
                read_connection_record(cursor, &nested, registry)?
            }
            OpCode::MessageData => {
                let read = read_message_record(cursor, &nested, registry, &mut *handler)?;
                stats.messages += 1;
                read
            }
            OpCode::IndexData | OpCode::ChunkInfo => {
                stats.skipped += 1;
                skip_record_data(cursor)?
            }
            OpCode::BagHeader | OpCode::Chunk | OpCode::Other(_) => {
                return Err(BagError::format(
                    "chunk",
                    format!("{op} record is not allowed inside a chunk"),
                ));
            }
        };
        stats.records += 1;
    }

    if consumed > payload_len {
        return Err(BagError::format(
            "chunk",
            format!(
                "chunk size exceeded: records span {consumed} bytes, declared payload is {payload_len} bytes"
            ),
        ));
    }

    Ok(4 + payload_len)
}

/// Skip a length-prefixed data region, returning the bytes consumed.
pub(crate) fn skip_record_data<R: Read + ?Sized>(cursor: &mut ByteCursor<R>) -> Result<u64> {
    let data_len = cursor.read_u32()?;
    cursor.skip(data_len as u64)?;
    Ok(4 + data_len as u64)
}
