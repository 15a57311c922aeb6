// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message-data records and the bounded body reader handed to consumers.
//!
//! A message body is never buffered. [`MessageData`] borrows the decoder's
//! cursor for the duration of one [`MessageHandler::handle_message`] call and
//! refuses any read that would cross the end of the message. Whatever the
//! handler leaves unread is skipped afterwards, so the next record always
//! starts at the right offset.

use std::io::Read;

use tracing::trace;

use crate::io::ByteCursor;
use crate::{BagError, Result, RosTime};

use super::connection::ConnectionRegistry;
use super::constants::fields;
use super::header::RecordHeader;

/// Consumer of decoded messages.
///
/// Called once per message-data record, in the order the records appear in
/// the file (top-level and chunk-embedded messages interleaved as stored, not
/// sorted by time). An error aborts decoding and is returned to the caller.
pub trait MessageHandler {
    /// Process one message. The body may be read partially or not at all.
    fn handle_message(&mut self, message: &mut MessageData<'_>) -> Result<()>;
}

/// Adapter running a closure as a [`MessageHandler`].
pub(crate) struct FnHandler<F>(pub(crate) F);

impl<F> MessageHandler for FnHandler<F>
where
    F: FnMut(&mut MessageData<'_>) -> Result<()>,
{
    fn handle_message(&mut self, message: &mut MessageData<'_>) -> Result<()> {
        (self.0)(message)
    }
}

/// `std_msgs/Header`: sequence number, time stamp and frame id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdHeader {
    /// Sequence id
    pub seq: u32,
    /// Time stamp of the data
    pub stamp: RosTime,
    /// Frame the data is associated with
    pub frame_id: String,
}

/// `geometry_msgs/Vector3` (same layout as `geometry_msgs/Point`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Create a vector.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Bounded view over the data region of one message-data record.
///
/// Every read checks the remaining budget first; asking for more than is
/// left fails with [`BagError::ContractViolation`] without touching the
/// source. Running out of source bytes inside the budget is a
/// [`BagError::UnexpectedEof`] instead.
pub struct MessageData<'a> {
    /// Cursor positioned inside the message data
    cursor: &'a mut ByteCursor<dyn Read + 'a>,
    /// Full header of the message-data record
    header: &'a RecordHeader,
    /// Topic resolved from the connection id
    topic: &'a str,
    /// Receive time from the record header
    time: RosTime,
    /// Declared data length
    length: u32,
    /// Bytes not consumed yet
    remaining: u32,
}

impl<'a> MessageData<'a> {
    fn new(
        cursor: &'a mut ByteCursor<dyn Read + 'a>,
        header: &'a RecordHeader,
        topic: &'a str,
        time: RosTime,
        length: u32,
    ) -> Self {
        Self {
            cursor,
            header,
            topic,
            time,
            length,
            remaining: length,
        }
    }

    /// Topic the message was published on.
    pub fn topic(&self) -> &str {
        self.topic
    }

    /// Time the message was recorded.
    pub fn time(&self) -> RosTime {
        self.time
    }

    /// All header fields of the message-data record.
    pub fn header(&self) -> &RecordHeader {
        self.header
    }

    /// Raw value of one header field.
    pub fn header_field(&self, name: &str) -> Option<&[u8]> {
        self.header.get(name)
    }

    /// Declared size of the message body in bytes.
    pub fn len(&self) -> u32 {
        self.length
    }

    /// Whether the message body is empty.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bytes of the body not read yet.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    fn ensure(&self, requested: u64, operation: &str) -> Result<()> {
        if requested > self.remaining as u64 {
            return Err(BagError::contract_violation(
                operation,
                requested,
                self.remaining as u64,
            ));
        }
        Ok(())
    }

    fn consumed(&mut self, count: u64) {
        // `ensure` ran first, so this never underflows.
        self.remaining -= count as u32;
    }

    /// Read an unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1, "read_u8")?;
        let value = self.cursor.read_u8()?;
        self.consumed(1);
        Ok(value)
    }

    /// Read a signed 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4, "read_i32")?;
        let value = self.cursor.read_i32()?;
        self.consumed(4);
        Ok(value)
    }

    /// Read an unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4, "read_u32")?;
        let value = self.cursor.read_u32()?;
        self.consumed(4);
        Ok(value)
    }

    /// Read a signed 64-bit integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8, "read_i64")?;
        let value = self.cursor.read_i64()?;
        self.consumed(8);
        Ok(value)
    }

    /// Read a `float32`.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4, "read_f32")?;
        let value = self.cursor.read_f32()?;
        self.consumed(4);
        Ok(value)
    }

    /// Read a `float64`.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8, "read_f64")?;
        let value = self.cursor.read_f64()?;
        self.consumed(8);
        Ok(value)
    }

    /// Read `count` raw bytes.
    ///
    /// `message.read_bytes(message.remaining())` returns the rest of the body.
    pub fn read_bytes(&mut self, count: u32) -> Result<Vec<u8>> {
        self.ensure(count as u64, "read_bytes")?;
        let bytes = self.cursor.read_bytes(count as u64)?;
        self.consumed(count as u64);
        Ok(bytes)
    }

    /// Read everything left in the body.
    pub fn read_remaining(&mut self) -> Result<Vec<u8>> {
        self.read_bytes(self.remaining)
    }

    /// Skip `count` bytes of the body.
    pub fn skip(&mut self, count: u32) -> Result<()> {
        self.ensure(count as u64, "skip")?;
        self.cursor.skip(count as u64)?;
        self.consumed(count as u64);
        Ok(())
    }

    /// Read a `string`: u32 length followed by that many UTF-8 bytes.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()?;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    /// Read a `time`: `int32` seconds then `int32` nanoseconds.
    pub fn read_time(&mut self) -> Result<RosTime> {
        self.ensure(8, "read_time")?;
        let sec = self.read_i32()?;
        let nsec = self.read_i32()?;
        Ok(RosTime::new(sec, nsec))
    }

    /// Read a `std_msgs/Header`.
    pub fn read_std_header(&mut self) -> Result<StdHeader> {
        let seq = self.read_u32()?;
        let stamp = self.read_time()?;
        let frame_id = self.read_string()?;
        Ok(StdHeader {
            seq,
            stamp,
            frame_id,
        })
    }

    /// Read a `geometry_msgs/Vector3`.
    pub fn read_vector3(&mut self) -> Result<Vector3> {
        self.ensure(24, "read_vector3")?;
        Ok(Vector3::new(
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
        ))
    }

    /// Read a `float32[]`: u32 element count followed by the elements.
    pub fn read_f32_array(&mut self) -> Result<Vec<f32>> {
        let count = self.read_array_len(4, "read_f32_array")?;
        (0..count).map(|_| self.read_f32()).collect()
    }

    /// Read a `float64[]`: u32 element count followed by the elements.
    pub fn read_f64_array(&mut self) -> Result<Vec<f64>> {
        let count = self.read_array_len(8, "read_f64_array")?;
        (0..count).map(|_| self.read_f64()).collect()
    }

    /// Read a `uint32[]`: u32 element count followed by the elements.
    pub fn read_u32_array(&mut self) -> Result<Vec<u32>> {
        let count = self.read_array_len(4, "read_u32_array")?;
        (0..count).map(|_| self.read_u32()).collect()
    }

    /// Read an array length and check the elements fit in the body.
    fn read_array_len(&mut self, element_size: u64, operation: &str) -> Result<u32> {
        let count = self.read_u32()?;
        self.ensure(count as u64 * element_size, operation)?;
        Ok(count)
    }

    /// Skip whatever the handler left unread.
    fn finish(&mut self) -> Result<()> {
        if self.remaining > 0 {
            trace!(
                topic = self.topic,
                unread = self.remaining,
                "skipping unread message bytes"
            );
            self.cursor.skip(self.remaining as u64)?;
            self.remaining = 0;
        }
        Ok(())
    }
}

/// Decode a message-data record whose header has already been read.
///
/// Resolves the topic, hands a [`MessageData`] bounded to the record data to
/// `handler`, then discards any bytes the handler did not read. Returns the
/// bytes consumed after the header: the 4-byte data length plus the data.
pub(crate) fn read_message_record<R, H>(
    cursor: &mut ByteCursor<R>,
    header: &RecordHeader,
    registry: &ConnectionRegistry,
    handler: &mut H,
) -> Result<u64>
where
    R: Read,
    H: MessageHandler + ?Sized,
{
    let conn = header.require_u32(fields::CONN, "message-data")?;
    let topic = registry.topic(conn).ok_or_else(|| {
        BagError::format(
            "message-data record",
            format!("connection id {conn} was not declared by a preceding connection record"),
        )
    })?;
    let time = header.require_time(fields::TIME, "message-data")?;
    let data_len = cursor.read_u32()?;

    let mut message = MessageData::new(cursor, header, topic, time, data_len);
    handler.handle_message(&mut message)?;
    message.finish()?;

    Ok(4 + data_len as u64)
}
