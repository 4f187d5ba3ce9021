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

//! Core recompiler components
//!
//! This module contains all translation stages:
//! - Machine code loader (text file of binary-digit words)
//! - Instruction decoder (BatPU-2 ISA)
//! - Control-flow analyzer (block starts and return targets)
//! - IR data model and builder
//! - Runtime interface declarations
//! - Per-opcode translator

pub mod cfg;
pub mod error;
pub mod ir;
pub mod isa;
pub mod loader;
pub mod runtime;
pub mod translate;

// Re-export commonly used types
pub use cfg::FlowMap;
pub use error::{RecompError, Result};
pub use ir::Module;
pub use isa::{Condition, Instruction, Opcode};
pub use runtime::Mode;
pub use translate::{translate, Options};
