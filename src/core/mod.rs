// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout bagstream.
//!
//! - [`BagError`] - error taxonomy for every decode failure
//! - [`RosTime`] - seconds/nanoseconds time stamp

pub mod error;
pub mod time;

pub use error::{BagError, Result};
pub use time::RosTime;
