// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Connection registry and connection record decoding.

use std::collections::HashMap;
use std::io::Read;

use tracing::trace;

use crate::io::ByteCursor;
use crate::Result;

use super::constants::fields;
use super::header::RecordHeader;

/// Mapping from connection id to topic name.
///
/// Shared by the whole file: connection records at the top level and inside
/// chunks both write into it. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    topics: HashMap<u32, String>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id -> topic`, replacing any earlier mapping for `id`.
    pub fn insert(&mut self, id: u32, topic: impl Into<String>) {
        self.topics.insert(id, topic.into());
    }

    /// Topic registered for `id`.
    pub fn topic(&self, id: u32) -> Option<&str> {
        self.topics.get(&id).map(String::as_str)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether no connection has been registered.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Iterate over `(id, topic)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.topics.iter().map(|(id, topic)| (*id, topic.as_str()))
    }
}

/// Decode a connection record whose header has already been read.
///
/// Registers the connection and skips the record data (type, md5sum and
/// message definition are not interpreted). Returns the bytes consumed after
/// the header: the 4-byte data length plus the data itself.
pub(crate) fn read_connection_record<R: Read>(
    cursor: &mut ByteCursor<R>,
    header: &RecordHeader,
    registry: &mut ConnectionRegistry,
) -> Result<u64> {
    let id = header.require_u32(fields::CONN, "connection")?;
    let topic = header.require_string(fields::TOPIC, "connection")?;
    trace!(conn = id, topic = %topic, "registering connection");
    registry.insert(id, topic);

    let data_len = cursor.read_u32()?;
    cursor.skip(data_len as u64)?;
    Ok(4 + data_len as u64)
}
