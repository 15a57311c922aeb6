// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS time stamps.

use std::fmt;

use chrono::{DateTime, Local, Utc};

/// Nanoseconds per second.
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// ROS time stored as a seconds part and a nanoseconds part.
///
/// Ordering compares seconds first, then nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RosTime {
    sec: i32,
    nsec: i32,
}

impl RosTime {
    /// Create a time stamp from its two parts.
    pub fn new(sec: i32, nsec: i32) -> Self {
        Self { sec, nsec }
    }

    /// Decode the 8-byte wire form: little-endian `sec` then `nsec`.
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        let sec = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let nsec = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Self { sec, nsec }
    }

    /// Seconds since the Unix epoch.
    pub fn sec(&self) -> i32 {
        self.sec
    }

    /// Nanoseconds past [`sec`](Self::sec).
    pub fn nsec(&self) -> i32 {
        self.nsec
    }

    /// The time as nanoseconds since the Unix epoch.
    pub fn as_nanos(&self) -> i64 {
        self.sec as i64 * NANOS_PER_SEC + self.nsec as i64
    }

    /// The time as a UTC calendar instant.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_nanos(self.as_nanos())
    }

    /// The time in the local time zone.
    pub fn to_local_datetime(&self) -> DateTime<Local> {
        self.to_datetime().with_timezone(&Local)
    }
}

impl fmt::Display for RosTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}
