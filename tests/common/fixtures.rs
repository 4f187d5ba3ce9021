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

//! Test fixtures: assemble BatPU-2 programs word by word

use batpu_recomp::core::ir::Module;
use batpu_recomp::core::isa::decode_program;
use batpu_recomp::core::runtime::Mode;
use batpu_recomp::core::translate::{translate, Options};

use super::eval::{run_module_with, Evaluation, StubRuntime};

fn op3(op: u16, a: u8, b: u8, c: u8) -> u16 {
    (op << 12) | ((a as u16) << 8) | ((b as u16) << 4) | (c as u16)
}

#[allow(dead_code)]
pub fn nop() -> u16 {
    0x0000
}

#[allow(dead_code)]
pub fn hlt() -> u16 {
    0x1000
}

#[allow(dead_code)]
pub fn add(a: u8, b: u8, c: u8) -> u16 {
    op3(0x2, a, b, c)
}

#[allow(dead_code)]
pub fn sub(a: u8, b: u8, c: u8) -> u16 {
    op3(0x3, a, b, c)
}

#[allow(dead_code)]
pub fn nor(a: u8, b: u8, c: u8) -> u16 {
    op3(0x4, a, b, c)
}

#[allow(dead_code)]
pub fn and(a: u8, b: u8, c: u8) -> u16 {
    op3(0x5, a, b, c)
}

#[allow(dead_code)]
pub fn xor(a: u8, b: u8, c: u8) -> u16 {
    op3(0x6, a, b, c)
}

#[allow(dead_code)]
pub fn rsh(a: u8, c: u8) -> u16 {
    op3(0x7, a, 0, c)
}

#[allow(dead_code)]
pub fn ldi(a: u8, imm: u8) -> u16 {
    op3(0x8, a, 0, 0) | imm as u16
}

#[allow(dead_code)]
pub fn adi(a: u8, imm: u8) -> u16 {
    op3(0x9, a, 0, 0) | imm as u16
}

#[allow(dead_code)]
pub fn jmp(addr: u16) -> u16 {
    0xA000 | (addr & 0x3FF)
}

/// `cond`: 0 = zero, 1 = notzero, 2 = carry, 3 = notcarry
#[allow(dead_code)]
pub fn brh(cond: u8, addr: u16) -> u16 {
    0xB000 | ((cond as u16 & 0x3) << 10) | (addr & 0x3FF)
}

#[allow(dead_code)]
pub fn cal(addr: u16) -> u16 {
    0xC000 | (addr & 0x3FF)
}

#[allow(dead_code)]
pub fn ret() -> u16 {
    0xD000
}

#[allow(dead_code)]
pub fn lod(a: u8, b: u8, offset: i8) -> u16 {
    op3(0xE, a, b, (offset as u8) & 0xF)
}

#[allow(dead_code)]
pub fn str_(a: u8, b: u8, offset: i8) -> u16 {
    op3(0xF, a, b, (offset as u8) & 0xF)
}

/// Render words as a machine code text file (16 binary digits per line)
#[allow(dead_code)]
pub fn assemble_text(words: &[u16]) -> String {
    words
        .iter()
        .map(|w| format!("{:016b}", w))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode and translate a program
#[allow(dead_code)]
pub fn build_module(words: &[u16], mode: Mode) -> Module {
    let program = decode_program(words).expect("decode failed");
    translate(&program, &Options::new("test.mc", mode)).expect("translation failed")
}

/// Translate in native mode and evaluate against a fresh recording stub
#[allow(dead_code)]
pub fn run_program(words: &[u16]) -> Evaluation {
    run_program_with(words, Mode::Native, StubRuntime::default())
}

/// Translate and evaluate with full control over mode and stub inputs
#[allow(dead_code)]
pub fn run_program_with(words: &[u16], mode: Mode, runtime: StubRuntime) -> Evaluation {
    let module = build_module(words, mode);
    module.verify().expect("module failed verification");
    run_module_with(&module, runtime)
}
