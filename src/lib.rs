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

//! BatPU-2 static recompiler library
//!
//! This library translates BatPU-2 machine code (16-bit instruction words)
//! into a typed SSA intermediate representation that can be handed to an
//! ahead-of-time compiler backend and linked against a small I/O runtime.
//!
//! # Example
//!
//! ```
//! use batpu_recomp::core::isa::decode_program;
//! use batpu_recomp::core::runtime::Mode;
//! use batpu_recomp::core::translate::{translate, Options};
//!
//! // LDI r1, 5; HLT
//! let words = [0x8105, 0x1000];
//! let program = decode_program(&words).unwrap();
//! let module = translate(&program, &Options::new("demo.mc", Mode::Native)).unwrap();
//! println!("{}", module);
//! ```

pub mod core;
