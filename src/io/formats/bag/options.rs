// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader configuration.

/// What to do with a top-level record whose opcode has no defined meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownOpPolicy {
    /// Skip the record's length-prefixed data and continue
    #[default]
    Skip,
    /// Fail with a format violation
    Reject,
}

/// Options for [`BagReader`](super::BagReader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Handling of unknown top-level opcodes
    pub unknown_ops: UnknownOpPolicy,

    /// Whether every byte of the bag header's data region must be the
    /// space fill character. When disabled the region is skipped unchecked.
    pub verify_header_padding: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            unknown_ops: UnknownOpPolicy::Skip,
            verify_header_padding: true,
        }
    }
}

impl ReaderOptions {
    /// Set the policy for unknown top-level opcodes.
    pub fn with_unknown_ops(mut self, policy: UnknownOpPolicy) -> Self {
        self.unknown_ops = policy;
        self
    }

    /// Enable or disable bag header padding verification.
    pub fn with_verify_header_padding(mut self, verify: bool) -> Self {
        self.verify_header_padding = verify;
        self
    }
}
