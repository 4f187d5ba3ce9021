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

//! LOD/STR lowering
//!
//! The effective address is `reg_a + offset` with 8-bit wraparound.
//! Addresses 0-239 are backing RAM; 240-255 are memory-mapped ports.
//! Each access lowers to one `switch` on the effective address whose
//! default edge is the RAM path; every outgoing path rejoins the block
//! following the instruction.
//!
//! Port map (STR unless noted):
//!
//! | Address | Effect |
//! |---------|--------|
//! | 240/241 | pixel cursor x/y |
//! | 242/243 | draw/clear pixel at the cursor |
//! | 244     | LOD: pixel readback |
//! | 245/246 | update/clear screen |
//! | 247-249 | character buffer: push, flush, clear |
//! | 250/251 | numeric display: show value, clear |
//! | 252/253 | numeric display signedness |
//! | 254     | LOD: random number |
//! | 255     | LOD: controller state |
//!
//! A STR to 244, 254 or 255 has no port behind it and traps.

use super::{ram_type, Translator};
use crate::core::error::Result;
use crate::core::ir::{BlockId, Pred, Type, Value};
use crate::core::isa::Instruction;

/// LOD ports: pixel readback, random source, controller
const LOD_PORTS: [u8; 3] = [244, 254, 255];

/// STR ports: everything mapped in 240-255 except the three LOD ports
const STR_PORTS: [u8; 13] = [240, 241, 242, 243, 245, 246, 247, 248, 249, 250, 251, 252, 253];

impl Translator<'_> {
    // === Memory Instructions ===

    /// The effective address `reg_a + offset`, wrapping modulo 256
    ///
    /// The offset constant is the two's-complement byte of the signed
    /// 4-bit field, so a negative offset becomes `256 + offset`.
    fn effective_addr(&mut self, ins: &Instruction) -> Value {
        let base = self.load_reg(ins.reg_a);
        self.b.add(base, Value::const_i8(ins.offset as u8))
    }

    /// Open the port case blocks for one memory instruction and emit the
    /// address switch, leaving the RAM path as the default edge.
    fn dispatch_ports(&mut self, ins: &Instruction, addr: &Value, ports: &[u8]) -> Vec<(u8, BlockId)> {
        let ram_block = self.b.append_block(format!("pc_{:04x}_mem", ins.pc));
        let cases: Vec<(u8, BlockId)> = ports
            .iter()
            .map(|&port| {
                let block = self
                    .b
                    .append_block(format!("pc_{:04x}_port_{}", ins.pc, port));
                (port, block)
            })
            .collect();

        self.b.switch(
            addr.clone(),
            ram_block,
            cases
                .iter()
                .map(|&(port, block)| (u64::from(port), block))
                .collect(),
        );

        self.b.position_at_end(ram_block);
        cases
    }

    /// LOD: `reg_b = mem[reg_a + offset]`
    pub(super) fn lower_lod(&mut self, ins: &Instruction) -> Result<()> {
        let next = self.fallthrough_after(ins.pc);
        let addr = self.effective_addr(ins);
        let cases = self.dispatch_ports(ins, &addr, &LOD_PORTS);

        // default: plain RAM read
        let ram = self.state.ram.clone();
        let cell = self.b.gep(ram_type(), ram, addr);
        let value = self.b.load(Type::I8, cell);
        self.store_reg(ins.reg_b, value);
        self.b.br(next);

        for (port, block) in cases {
            self.b.position_at_end(block);
            self.emit_load_port(ins, port);
            self.b.br(next);
        }
        Ok(())
    }

    /// One LOD port: read a runtime source into `reg_b`
    ///
    /// Headless mode has no pixel surface and no controller; those reads
    /// become a constant 0.
    fn emit_load_port(&mut self, ins: &Instruction, port: u8) {
        match port {
            244 => match self.runtime.graphics().map(|g| g.get_pixel.clone()) {
                Some(get_pixel) => {
                    let x_cell = self.state.pixel_x.clone();
                    let y_cell = self.state.pixel_y.clone();
                    let x = self.b.load(Type::I8, x_cell);
                    let y = self.b.load(Type::I8, y_cell);
                    if let Some(value) = self.b.call(&get_pixel, vec![x, y]) {
                        self.store_reg(ins.reg_b, value);
                    }
                }
                None => self.store_reg(ins.reg_b, Value::const_i8(0)),
            },
            254 => {
                let get_random_num = self.runtime.get_random_num().clone();
                if let Some(value) = self.b.call(&get_random_num, vec![]) {
                    self.store_reg(ins.reg_b, value);
                }
            }
            255 => match self.runtime.get_controller().cloned() {
                Some(get_controller) => {
                    if let Some(value) = self.b.call(&get_controller, vec![]) {
                        self.store_reg(ins.reg_b, value);
                    }
                }
                None => self.store_reg(ins.reg_b, Value::const_i8(0)),
            },
            _ => unreachable!("not a LOD port: {}", port),
        }
    }

    /// STR: `mem[reg_a + offset] = reg_b`
    ///
    /// The default edge splits once more: addresses below 240 write RAM,
    /// the remaining mapped addresses have no STR port and trap.
    pub(super) fn lower_str(&mut self, ins: &Instruction) -> Result<()> {
        let next = self.fallthrough_after(ins.pc);
        let addr = self.effective_addr(ins);
        let cases = self.dispatch_ports(ins, &addr, &STR_PORTS);

        // default: RAM if below the mapped range, otherwise a fatal store
        let in_ram = self.b.icmp(Pred::Ult, addr.clone(), Value::const_i8(240));
        let ram_block = self.b.append_block(format!("pc_{:04x}_ram", ins.pc));
        let trap = self.trap;
        self.b.cond_br(in_ram, ram_block, trap);

        self.b.position_at_end(ram_block);
        let ram = self.state.ram.clone();
        let cell = self.b.gep(ram_type(), ram, addr);
        let value = self.load_reg(ins.reg_b);
        self.b.store(value, cell);
        self.b.br(next);

        for (port, block) in cases {
            self.b.position_at_end(block);
            self.emit_store_port(ins, port);
            self.b.br(next);
        }
        Ok(())
    }

    /// One STR port: forward `reg_b` (or nothing) to the runtime
    ///
    /// Headless mode drops the graphics calls entirely; the pixel cursor
    /// stores stay, since the cursor is plain machine state.
    fn emit_store_port(&mut self, ins: &Instruction, port: u8) {
        match port {
            240 => {
                let value = self.load_reg(ins.reg_b);
                let cell = self.state.pixel_x.clone();
                self.b.store(value, cell);
            }
            241 => {
                let value = self.load_reg(ins.reg_b);
                let cell = self.state.pixel_y.clone();
                self.b.store(value, cell);
            }
            242 | 243 => {
                let decl = self.runtime.graphics().map(|g| {
                    if port == 242 {
                        g.draw_pixel.clone()
                    } else {
                        g.clear_pixel.clone()
                    }
                });
                if let Some(decl) = decl {
                    let x_cell = self.state.pixel_x.clone();
                    let y_cell = self.state.pixel_y.clone();
                    let x = self.b.load(Type::I8, x_cell);
                    let y = self.b.load(Type::I8, y_cell);
                    self.b.call(&decl, vec![x, y]);
                }
            }
            245 | 246 => {
                let decl = self.runtime.graphics().map(|g| {
                    if port == 245 {
                        g.update_screen.clone()
                    } else {
                        g.clear_screen.clone()
                    }
                });
                if let Some(decl) = decl {
                    self.b.call(&decl, vec![]);
                }
            }
            247 => {
                let push_char = self.runtime.push_char().clone();
                let value = self.load_reg(ins.reg_b);
                self.b.call(&push_char, vec![value]);
            }
            248 => {
                let flush = self.runtime.flush_char_buffer().clone();
                self.b.call(&flush, vec![]);
            }
            249 => {
                let clear = self.runtime.clear_char_buffer().clone();
                self.b.call(&clear, vec![]);
            }
            250 => {
                let set_num = self.runtime.set_num().clone();
                let value = self.load_reg(ins.reg_b);
                self.b.call(&set_num, vec![value]);
            }
            251 => {
                let set_num = self.runtime.set_num().clone();
                self.b.call(&set_num, vec![Value::const_i8(0)]);
            }
            252 | 253 => {
                let set_signedness = self.runtime.set_signedness().clone();
                self.b
                    .call(&set_signedness, vec![Value::const_i1(port == 253)]);
            }
            _ => unreachable!("not a STR port: {}", port),
        }
    }
}
