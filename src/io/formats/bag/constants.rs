// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 bag (version 2.0) wire constants.

use std::fmt;

/// Literal bytes every bag file starts with.
pub const PREAMBLE: &[u8] = b"#ROSBAG V2.0\n";

/// Fill byte of the bag header record's data region.
pub const HEADER_PADDING: u8 = b' ';

/// Chunk compression identifier for uncompressed payloads.
pub const COMPRESSION_NONE: &str = "none";

/// Header field names the decoder interprets.
pub mod fields {
    /// Record opcode, present on every record (1 byte).
    pub const OP: &str = "op";
    /// Connection id on connection and message-data records (4 bytes LE).
    pub const CONN: &str = "conn";
    /// Topic name on connection records.
    pub const TOPIC: &str = "topic";
    /// Receive time on message-data records (sec, nsec as LE i32).
    pub const TIME: &str = "time";
    /// Compression codec on chunk records.
    pub const COMPRESSION: &str = "compression";
    /// Uncompressed payload size on chunk records (4 bytes LE).
    pub const SIZE: &str = "size";
    /// Offset of the first index record, on the bag header (8 bytes LE).
    pub const INDEX_POS: &str = "index_pos";
    /// Number of distinct connections, on the bag header (4 bytes LE).
    pub const CONN_COUNT: &str = "conn_count";
    /// Number of chunks, on the bag header (4 bytes LE).
    pub const CHUNK_COUNT: &str = "chunk_count";
}

/// Record kind selected by the `op` header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// 0x02: message data
    MessageData,
    /// 0x03: bag header, unique and first
    BagHeader,
    /// 0x04: index data
    IndexData,
    /// 0x05: chunk
    Chunk,
    /// 0x06: chunk info
    ChunkInfo,
    /// 0x07: connection
    Connection,
    /// Any value without a defined meaning
    Other(u8),
}

impl OpCode {
    /// Wire value of the opcode.
    pub fn as_u8(self) -> u8 {
        match self {
            OpCode::MessageData => 0x02,
            OpCode::BagHeader => 0x03,
            OpCode::IndexData => 0x04,
            OpCode::Chunk => 0x05,
            OpCode::ChunkInfo => 0x06,
            OpCode::Connection => 0x07,
            OpCode::Other(op) => op,
        }
    }

    /// Human-readable record kind, used in error contexts.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::MessageData => "message-data",
            OpCode::BagHeader => "bag header",
            OpCode::IndexData => "index data",
            OpCode::Chunk => "chunk",
            OpCode::ChunkInfo => "chunk info",
            OpCode::Connection => "connection",
            OpCode::Other(_) => "unknown",
        }
    }
}

impl From<u8> for OpCode {
    fn from(op: u8) -> Self {
        match op {
            0x02 => OpCode::MessageData,
            0x03 => OpCode::BagHeader,
            0x04 => OpCode::IndexData,
            0x05 => OpCode::Chunk,
            0x06 => OpCode::ChunkInfo,
            0x07 => OpCode::Connection,
            other => OpCode::Other(other),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (op=0x{:02x})", self.name(), self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_from_u8() {
        assert_eq!(OpCode::from(0x02), OpCode::MessageData);
        assert_eq!(OpCode::from(0x03), OpCode::BagHeader);
        assert_eq!(OpCode::from(0x05), OpCode::Chunk);
        assert_eq!(OpCode::from(0x07), OpCode::Connection);
        assert_eq!(OpCode::from(0x42), OpCode::Other(0x42));
    }

    #[test]
    fn test_opcode_wire_value() {
        for op in 0u8..=0xFF {
            assert_eq!(OpCode::from(op).as_u8(), op);
        }
    }

    #[test]
    fn test_opcode_display() {
        assert_eq!(OpCode::Chunk.to_string(), "chunk (op=0x05)");
        assert_eq!(OpCode::Other(0x10).to_string(), "unknown (op=0x10)");
    }

    #[test]
    fn test_preamble_length() {
        assert_eq!(PREAMBLE.len(), 13);
    }
}
