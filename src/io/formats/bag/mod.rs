// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 bag format implementation.
//!
//! This module provides a forward-only streaming decoder for uncompressed
//! version 2.0 bags:
//! - Record header decoding with typed field access
//! - Connection registration and topic resolution
//! - Bounded message views handed to a caller-supplied handler
//! - Transparent descent into uncompressed chunks

// Chunk records
mod chunk;

// Connection records and the id -> topic registry
pub mod connection;

// Wire constants and op codes
pub mod constants;

// Record header fields
pub mod header;

// Message views and handlers
pub mod message;

// Bag header summary fields
pub mod metadata;

// Reader configuration
pub mod options;

// Top-level record loop
pub mod parser;

// Re-exports
pub use connection::ConnectionRegistry;
pub use constants::OpCode;
pub use header::RecordHeader;
pub use message::{MessageData, MessageHandler, StdHeader, Vector3};
pub use metadata::BagMetadata;
pub use options::{ReaderOptions, UnknownOpPolicy};
pub use parser::{BagReader, ParseStats};
