// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Streaming ROS1 bag reader.
//!
//! # Format (version 2.0)
//!
//! ## File header
//! - Magic: `#ROSBAG V2.0\n` (13 bytes)
//! - A bag header record (op 0x03) whose data is space padding
//!
//! ## Records
//! Every record is `<header_len: u32><header><data_len: u32><data>`, the
//! header being `<field_len: u32><name>=<value>` entries.
//!
//! ## Op codes
//! - 0x02: Message data
//! - 0x03: Bag header
//! - 0x04: Index data
//! - 0x05: Chunk
//! - 0x06: Chunk info
//! - 0x07: Connection
//!
//! The reader walks records strictly forward. Index and chunk-info records
//! are skipped; nothing ever seeks, so any blocking [`Read`] works as a
//! source, including pipes and sockets.

use std::io::Read;

use tracing::{debug, trace, warn};

use crate::io::ByteCursor;
use crate::{BagError, Result};

use super::chunk::{read_chunk_record, skip_record_data};
use super::connection::{read_connection_record, ConnectionRegistry};
use super::constants::{OpCode, HEADER_PADDING, PREAMBLE};
use super::header::RecordHeader;
use super::message::{read_message_record, FnHandler, MessageData, MessageHandler};
use super::metadata::BagMetadata;
use super::options::{ReaderOptions, UnknownOpPolicy};

/// Block size used when verifying the bag header padding.
const PADDING_BLOCK: usize = 4096;

/// Counters collected over one [`BagReader::parse_bag`] run.
///
/// Record counts include records nested inside chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Records decoded, at top level and inside chunks
    pub records: u64,
    /// Chunk records
    pub chunks: u64,
    /// Connection records
    pub connections: u64,
    /// Messages delivered to the handler
    pub messages: u64,
    /// Index, chunk-info and unknown records skipped
    pub skipped: u64,
    /// Stream position when the run ended
    pub bytes: u64,
}

/// Forward-only decoder for an uncompressed ROS1 bag stream.
///
/// Construction consumes and validates the preamble and the bag header;
/// [`parse_bag`](Self::parse_bag) then drives the handler over every message
/// in stream order.
///
/// # Example
///
/// ```no_run
/// # fn main() -> bagstream::Result<()> {
/// use std::fs::File;
/// use std::io::BufReader;
///
/// use bagstream::BagReader;
///
/// let file = BufReader::new(File::open("imu.bag")?);
/// let mut reader = BagReader::new(file)?;
/// reader.for_each_message(|msg| {
///     if msg.topic() == "/imu" {
///         let header = msg.read_std_header()?;
///         println!("{} {}", msg.time(), header.frame_id);
///     }
///     Ok(())
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct BagReader<R: Read> {
    cursor: ByteCursor<R>,
    connections: ConnectionRegistry,
    bag_header: RecordHeader,
    options: ReaderOptions,
}

impl<R: Read> BagReader<R> {
    /// Open a bag stream with default options.
    pub fn new(source: R) -> Result<Self> {
        Self::with_options(source, ReaderOptions::default())
    }

    /// Open a bag stream, validating the preamble and bag header.
    pub fn with_options(source: R, options: ReaderOptions) -> Result<Self> {
        let mut cursor = ByteCursor::new(source);
        read_preamble(&mut cursor)?;
        let bag_header = read_bag_header(&mut cursor, options.verify_header_padding)?;

        debug!(
            fields = bag_header.len(),
            position = cursor.position(),
            "accepted bag header"
        );

        Ok(Self {
            cursor,
            connections: ConnectionRegistry::new(),
            bag_header,
            options,
        })
    }

    /// Header fields of the bag header record.
    pub fn bag_header(&self) -> &RecordHeader {
        &self.bag_header
    }

    /// Typed summary fields of the bag header.
    pub fn metadata(&self) -> Result<BagMetadata> {
        BagMetadata::from_header(&self.bag_header)
    }

    /// Connections registered so far.
    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Bytes consumed from the source so far.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Options the reader was opened with.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Return the underlying source.
    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }

    /// Decode records until the stream ends, delivering each message to
    /// `handler` in stream order.
    ///
    /// The only clean end is end-of-stream exactly at a record boundary. A
    /// handler error aborts the run and is returned unchanged.
    pub fn parse_bag<H>(&mut self, handler: &mut H) -> Result<ParseStats>
    where
        H: MessageHandler + ?Sized,
    {
        let mut stats = ParseStats::default();

        while let Some(header_len) = self.cursor.try_read_u32()? {
            let start = self.cursor.position() - 4;
            let header = RecordHeader::read(&mut self.cursor, header_len)?;
            let op = header.op()?;
            trace!(%op, position = start, "record");

            match op {
                OpCode::BagHeader => {
                    return Err(BagError::format(
                        "record stream",
                        format!("second bag header record at byte {start}"),
                    ));
                }
                OpCode::Connection => {
                    read_connection_record(&mut self.cursor, &header, &mut self.connections)?;
                    stats.connections += 1;
                }
                OpCode::MessageData => {
                    read_message_record(
                        &mut self.cursor,
                        &header,
                        &self.connections,
                        &mut *handler,
                    )?;
                    stats.messages += 1;
                }
                OpCode::Chunk => {
                    read_chunk_record(
                        &mut self.cursor,
                        &header,
                        &mut self.connections,
                        &mut *handler,
                        &mut stats,
                    )?;
                    stats.chunks += 1;
                }
                OpCode::IndexData | OpCode::ChunkInfo => {
                    skip_record_data(&mut self.cursor)?;
                    stats.skipped += 1;
                }
                OpCode::Other(code) => match self.options.unknown_ops {
                    UnknownOpPolicy::Skip => {
                        warn!(op = code, position = start, "skipping record with unknown op");
                        skip_record_data(&mut self.cursor)?;
                        stats.skipped += 1;
                    }
                    UnknownOpPolicy::Reject => {
                        return Err(BagError::format(
                            "record stream",
                            format!("unknown op 0x{code:02x} at byte {start}"),
                        ));
                    }
                },
            }
            stats.records += 1;
        }

        stats.bytes = self.cursor.position();
        debug!(
            records = stats.records,
            messages = stats.messages,
            chunks = stats.chunks,
            bytes = stats.bytes,
            "bag stream finished"
        );
        Ok(stats)
    }

    /// Like [`parse_bag`](Self::parse_bag), with a closure as the handler.
    pub fn for_each_message<F>(&mut self, f: F) -> Result<ParseStats>
    where
        F: FnMut(&mut MessageData<'_>) -> Result<()>,
    {
        self.parse_bag(&mut FnHandler(f))
    }
}

/// Check the fixed preamble byte by byte.
fn read_preamble<R: Read>(cursor: &mut ByteCursor<R>) -> Result<()> {
    for &expected in PREAMBLE {
        let position = cursor.position();
        let byte = cursor.read_u8()?;
        if byte != expected {
            return Err(BagError::format(
                "preamble",
                format!(
                    "expected {:?} at byte {position}, found {:?}",
                    expected as char, byte as char
                ),
            ));
        }
    }
    Ok(())
}

/// Read the bag header record and consume its padding.
fn read_bag_header<R: Read>(
    cursor: &mut ByteCursor<R>,
    verify_padding: bool,
) -> Result<RecordHeader> {
    let header_len = cursor.read_u32()?;
    let header = RecordHeader::read(cursor, header_len)?;
    let op = header.op()?;
    if op != OpCode::BagHeader {
        return Err(BagError::format(
            "bag header",
            format!("first record is {op}, expected {}", OpCode::BagHeader),
        ));
    }

    let data_len = cursor.read_u32()? as u64;
    if !verify_padding {
        cursor.skip(data_len)?;
        return Ok(header);
    }

    let mut block = [0u8; PADDING_BLOCK];
    let mut left = data_len;
    while left > 0 {
        let n = left.min(PADDING_BLOCK as u64) as usize;
        let start = cursor.position();
        cursor.read_into(&mut block[..n])?;
        if let Some(offset) = block[..n].iter().position(|&b| b != HEADER_PADDING) {
            return Err(BagError::format(
                "bag header",
                format!(
                    "padding byte 0x{:02x} at byte {} is not a space",
                    block[offset],
                    start + offset as u64
                ),
            ));
        }
        left -= n as u64;
    }

    Ok(header)
}
