// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 batpu-recomp contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Recompiler error types

use thiserror::Error;

/// Result type for recompiler operations
pub type Result<T> = std::result::Result<T, RecompError>;

/// Recompiler error types
#[derive(Debug, Error)]
pub enum RecompError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input line is not a 16-digit binary word
    #[error("line {line}: expected 16 binary digits, found {found:?}")]
    MalformedLine {
        /// 1-based line number in the input file
        line: usize,
        /// The offending line content
        found: String,
    },

    /// Program exceeds the machine's code space
    #[error("program too large: {count} instructions (limit {limit})")]
    ProgramTooLarge {
        /// Number of instruction words in the input
        count: usize,
        /// Maximum supported program length
        limit: usize,
    },

    /// Opcode field outside the 4-bit encoding space
    #[error("invalid opcode {bits:#06x}")]
    InvalidOpcode {
        /// The rejected opcode bits
        bits: u16,
    },

    /// A transfer references an address with no basic block
    #[error("no basic block covers address {addr:#05x}")]
    MissingBlock {
        /// The uncovered code address
        addr: u16,
    },

    /// A basic block was left without a terminator
    #[error("block {label} is not terminated")]
    UnterminatedBlock {
        /// Label of the offending block
        label: String,
    },
}
