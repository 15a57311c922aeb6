// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

pub const OP_MSG_DATA: u8 = 0x02;
pub const OP_BAG_HEADER: u8 = 0x03;
pub const OP_INDEX_DATA: u8 = 0x04;
pub const OP_CHUNK: u8 = 0x05;
pub const OP_CHUNK_INFO: u8 = 0x06;
pub const OP_CONNECTION: u8 = 0x07;

// ============================================================================
// Record encoding
// ============================================================================

pub fn write_u32(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

pub fn time_to_bytes(sec: i32, nsec: i32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8);
    bytes.extend_from_slice(&sec.to_le_bytes());
    bytes.extend_from_slice(&nsec.to_le_bytes());
    bytes
}

/// Write a record header block, returning its length.
pub fn write_header(buffer: &mut Vec<u8>, fields: &BTreeMap<String, Vec<u8>>) -> u32 {
    let mut header_data = Vec::new();
    for (key, value) in fields {
        write_u32(&mut header_data, (key.len() + 1 + value.len()) as u32);
        header_data.extend_from_slice(key.as_bytes());
        header_data.push(b'=');
        header_data.extend_from_slice(value);
    }

    let header_len = header_data.len() as u32;
    write_u32(buffer, header_len);
    buffer.extend(header_data);
    header_len
}

/// Encode a full record.
pub fn record(fields: &BTreeMap<String, Vec<u8>>, data: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::new();
    write_header(&mut buffer, fields);
    write_u32(&mut buffer, data.len() as u32);
    buffer.extend_from_slice(data);
    buffer
}

fn fields_with_op(op: u8) -> BTreeMap<String, Vec<u8>> {
    let mut fields = BTreeMap::new();
    fields.insert("op".to_string(), vec![op]);
    fields
}

pub fn connection_record(conn: u32, topic: &str) -> Vec<u8> {
    let mut fields = fields_with_op(OP_CONNECTION);
    fields.insert("conn".to_string(), conn.to_le_bytes().to_vec());
    fields.insert("topic".to_string(), topic.as_bytes().to_vec());

    let mut data = BTreeMap::new();
    data.insert("type".to_string(), b"std_msgs/Int32".to_vec());
    data.insert("md5sum".to_string(), b"da5909fbe378aeaf85e547e830cc1bb7".to_vec());
    data.insert("message_definition".to_string(), b"int32 data\n".to_vec());
    let mut data_bytes = Vec::new();
    for (key, value) in &data {
        write_u32(&mut data_bytes, (key.len() + 1 + value.len()) as u32);
        data_bytes.extend_from_slice(key.as_bytes());
        data_bytes.push(b'=');
        data_bytes.extend_from_slice(value);
    }

    record(&fields, &data_bytes)
}

pub fn message_record(conn: u32, sec: i32, nsec: i32, body: &[u8]) -> Vec<u8> {
    let mut fields = fields_with_op(OP_MSG_DATA);
    fields.insert("conn".to_string(), conn.to_le_bytes().to_vec());
    fields.insert("time".to_string(), time_to_bytes(sec, nsec));
    record(&fields, body)
}

pub fn index_record(conn: u32) -> Vec<u8> {
    let mut fields = fields_with_op(OP_INDEX_DATA);
    fields.insert("ver".to_string(), 1u32.to_le_bytes().to_vec());
    fields.insert("conn".to_string(), conn.to_le_bytes().to_vec());
    fields.insert("count".to_string(), 1u32.to_le_bytes().to_vec());
    let mut data = time_to_bytes(5, 0);
    write_u32(&mut data, 0);
    record(&fields, &data)
}

pub fn chunk_info_record() -> Vec<u8> {
    let mut fields = fields_with_op(OP_CHUNK_INFO);
    fields.insert("ver".to_string(), 1u32.to_le_bytes().to_vec());
    fields.insert("chunk_pos".to_string(), 4117u64.to_le_bytes().to_vec());
    fields.insert("count".to_string(), 0u32.to_le_bytes().to_vec());
    record(&fields, &[])
}

/// Wrap already-encoded records in a chunk record.
pub fn chunk_record(compression: &str, payload: &[u8]) -> Vec<u8> {
    chunk_record_with_len(compression, payload, payload.len() as u32)
}

/// Chunk record whose declared payload length may disagree with `payload`.
pub fn chunk_record_with_len(compression: &str, payload: &[u8], declared: u32) -> Vec<u8> {
    let mut fields = fields_with_op(OP_CHUNK);
    fields.insert("compression".to_string(), compression.as_bytes().to_vec());
    fields.insert("size".to_string(), (payload.len() as u32).to_le_bytes().to_vec());

    let mut buffer = Vec::new();
    write_header(&mut buffer, &fields);
    write_u32(&mut buffer, declared);
    buffer.extend_from_slice(payload);
    buffer
}

/// Record carrying an arbitrary op code.
pub fn op_record(op: u8, data: &[u8]) -> Vec<u8> {
    record(&fields_with_op(op), data)
}

// ============================================================================
// Bag builder
// ============================================================================

/// Assembles an in-memory bag: preamble, padded bag header, then records.
#[derive(Debug, Clone)]
pub struct BagBuilder {
    buffer: Vec<u8>,
}

impl Default for BagBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BagBuilder {
    /// Start a bag with a bag header padded by `padding` spaces.
    pub fn with_padding(padding: usize) -> Self {
        let mut buffer = b"#ROSBAG V2.0\n".to_vec();
        let mut fields = fields_with_op(OP_BAG_HEADER);
        fields.insert("index_pos".to_string(), 0u64.to_le_bytes().to_vec());
        fields.insert("conn_count".to_string(), 1u32.to_le_bytes().to_vec());
        fields.insert("chunk_count".to_string(), 0u32.to_le_bytes().to_vec());
        buffer.extend(record(&fields, &vec![b' '; padding]));
        Self { buffer }
    }

    pub fn new() -> Self {
        Self::with_padding(64)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    pub fn connection(self, conn: u32, topic: &str) -> Self {
        self.raw(&connection_record(conn, topic))
    }

    pub fn message(self, conn: u32, sec: i32, nsec: i32, body: &[u8]) -> Self {
        self.raw(&message_record(conn, sec, nsec, body))
    }

    pub fn build(self) -> Vec<u8> {
        self.buffer
    }
}
