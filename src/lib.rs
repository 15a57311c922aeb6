// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Bagstream
//!
//! Streaming decoder for ROS1 bag (`#ROSBAG V2.0`) files.
//!
//! The decoder reads any blocking byte source strictly forward, validates
//! the preamble and bag header, learns connection topics as they appear,
//! and hands every message-data record to a handler in stream order.
//! Uncompressed chunks are descended into transparently.
//!
//! ## Architecture
//!
//! - `core/` - Error type and bag timestamps
//! - `io/cursor.rs` - Little-endian primitive reads with position tracking
//! - `io/formats/bag/` - Record headers, connections, messages, chunks and
//!   the top-level reader
//!
//! ## Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use bagstream::BagReader;
//!
//! let mut reader = BagReader::new(BufReader::new(File::open("run.bag")?))?;
//! let stats = reader.for_each_message(|msg| {
//!     if msg.topic() == "/odom/velocity" {
//!         let v = msg.read_vector3()?;
//!         println!("{}: ({}, {}, {})", msg.time(), v.x, v.y, v.z);
//!     }
//!     Ok(())
//! })?;
//! println!("{} messages", stats.messages);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{BagError, Result, RosTime};

// I/O types (byte cursor, format decoders)
pub mod io;

pub use io::formats::bag::{
    BagMetadata, BagReader, ConnectionRegistry, MessageData, MessageHandler, OpCode, ParseStats,
    ReaderOptions, RecordHeader, StdHeader, UnknownOpPolicy, Vector3,
};
pub use io::ByteCursor;
