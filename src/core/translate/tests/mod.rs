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

//! Translator test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: function shell, machine state, terminator closure
//! - `instructions`: per-opcode lowering shapes and flag updates



#[cfg(test)]
mod support {
    use crate::core::ir::{Block, Function, Module};
    use crate::core::isa::decode_program;
    use crate::core::runtime::Mode;
    use crate::core::translate::{translate, Options};

    /// Decode and translate a word list in native mode
    pub fn translate_words(words: &[u16]) -> Module {
        translate_words_in(words, Mode::Native)
    }

    /// Decode and translate a word list in the given mode
    pub fn translate_words_in(words: &[u16], mode: Mode) -> Module {
        let program = decode_program(words).expect("decode failed");
        translate(&program, &Options::new("test.mc", mode)).expect("translation failed")
    }

    /// The translated entry function
    pub fn entry_function(module: &Module) -> &Function {
        &module.functions()[0]
    }

    /// Find a block by label
    pub fn block_by_label<'m>(func: &'m Function, label: &str) -> &'m Block {
        func.blocks()
            .iter()
            .find(|b| b.label() == label)
            .unwrap_or_else(|| panic!("no block labeled {}", label))
    }
}
