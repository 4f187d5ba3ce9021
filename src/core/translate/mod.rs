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

//! Machine code to IR translation
//!
//! The translator builds one entry function around the decoded program:
//!
//! 1. The control-flow analyzer picks the basic-block boundaries.
//! 2. The function shell is laid down: machine state allocas in the entry
//!    block, one block per boundary, and the exit and trap blocks.
//! 3. Each instruction is lowered into the block containing its address,
//!    organized by instruction type:
//!    - `arithmetic`: ADD, SUB, LDI, ADI (Z and C flag updates)
//!    - `logical`: NOR, AND, XOR, RSH (Z flag only)
//!    - `branch`: JMP, BRH, CAL, RET, HLT (the private call stack)
//!    - `memory`: LOD, STR (RAM and memory-mapped I/O dispatch)
//! 4. Blocks still open after the walk fall through to their successor.
//!
//! The emitted machine state is private to the entry function: 256 bytes of
//! RAM, sixteen 8-bit registers (register 0 stays zero by construction),
//! the Z and C flags, the pixel cursor and a 16-slot call stack.

mod arithmetic;
mod branch;
mod logical;
mod memory;

mod tests;

use std::collections::BTreeMap;

use super::cfg::FlowMap;
use super::error::{RecompError, Result};
use super::ir::{BlockId, Builder, Module, Pred, Type, Value};
use super::isa::{Instruction, Opcode};
use super::runtime::{Mode, Runtime};

/// Translation options
#[derive(Debug, Clone)]
pub struct Options {
    /// Module identifier, conventionally the input file name
    pub module_name: String,
    /// I/O lowering mode
    pub mode: Mode,
}

impl Options {
    pub fn new(module_name: impl Into<String>, mode: Mode) -> Self {
        Self {
            module_name: module_name.into(),
            mode,
        }
    }
}

/// The RAM cell array type: 240 real bytes plus the 16 mapped port addresses
fn ram_type() -> Type {
    Type::array(Type::I8, 256)
}

/// The call stack type: 16 slots of 16-bit return addresses
fn stack_type() -> Type {
    Type::array(Type::I16, 16)
}

/// Pointers to the machine state cells allocated in the entry block
struct MachineState {
    ram: Value,
    stack: Value,
    sp: Value,
    regs: Vec<Value>,
    flag_z: Value,
    flag_c: Value,
    pixel_x: Value,
    pixel_y: Value,
}

impl MachineState {
    /// Allocate and zero-initialize every cell
    fn alloc(b: &mut Builder) -> Self {
        let ram = b.alloca("ram", ram_type());
        b.store(Value::Zero(ram_type()), ram.clone());

        let stack = b.alloca("stack", stack_type());
        b.store(Value::Zero(stack_type()), stack.clone());

        let sp = b.alloca("sp", Type::I8);
        b.store(Value::const_i8(0), sp.clone());

        let regs: Vec<Value> = (0..16)
            .map(|reg| {
                let cell = b.alloca(&format!("reg_{}", reg), Type::I8);
                b.store(Value::const_i8(0), cell.clone());
                cell
            })
            .collect();

        let flag_z = b.alloca("flag_z", Type::I1);
        b.store(Value::const_i1(false), flag_z.clone());
        let flag_c = b.alloca("flag_c", Type::I1);
        b.store(Value::const_i1(false), flag_c.clone());

        let pixel_x = b.alloca("pixel_x", Type::I8);
        b.store(Value::const_i8(0), pixel_x.clone());
        let pixel_y = b.alloca("pixel_y", Type::I8);
        b.store(Value::const_i8(0), pixel_y.clone());

        Self {
            ram,
            stack,
            sp,
            regs,
            flag_z,
            flag_c,
            pixel_x,
            pixel_y,
        }
    }
}

/// Translation state threaded through the per-opcode lowering
struct Translator<'a> {
    program: &'a [Instruction],
    flow: FlowMap,
    module: Module,
    b: Builder,
    runtime: Runtime,
    /// Block map: program counter of each block start, ascending
    blocks: BTreeMap<u16, BlockId>,
    state: MachineState,
    exit: BlockId,
    trap: BlockId,
}

/// Translate a decoded program into an IR module
///
/// # Arguments
///
/// * `program` - The decoded code array
/// * `opts` - Module name and I/O lowering mode
///
/// # Returns
///
/// The verified module, or an error if a transfer target escapes the block
/// map or a block is left unterminated (both translator bugs by
/// construction).
pub fn translate(program: &[Instruction], opts: &Options) -> Result<Module> {
    log::info!(
        "translating {} instructions ({:?} mode)",
        program.len(),
        opts.mode
    );

    Translator::new(program, opts).run()
}

impl<'a> Translator<'a> {
    fn new(program: &'a [Instruction], opts: &Options) -> Self {
        let flow = FlowMap::analyze(program);
        let mut module = Module::new(opts.module_name.clone());
        let runtime = Runtime::declare(&mut module, opts.mode);

        let mut b = Builder::new("main", Type::I32);
        let entry = b.append_block("entry");
        b.position_at_end(entry);
        let state = MachineState::alloc(&mut b);

        let mut blocks = BTreeMap::new();
        for &start in flow.block_starts() {
            blocks.insert(start, b.append_block(format!("pc_{:04x}", start)));
        }
        let exit = b.append_block("exit");
        let trap = b.append_block("trap");

        // entry: state is in place, hand control to the first block
        let init = runtime.init().clone();
        b.call(&init, vec![]);
        b.br(blocks[&0]);

        b.position_at_end(exit);
        let deinit = runtime.deinit().clone();
        b.call(&deinit, vec![]);
        b.ret(Value::const_i32(0));

        b.position_at_end(trap);
        let raise_error = runtime.raise_error().clone();
        b.call(&raise_error, vec![]);
        b.ret(Value::const_i32(1));

        Self {
            program,
            flow,
            module,
            b,
            runtime,
            blocks,
            state,
            exit,
            trap,
        }
    }

    fn run(mut self) -> Result<Module> {
        for ins in self.program {
            let start = self.flow.containing_block(ins.pc);
            let block = self.blocks[&start];
            if self.b.is_terminated(block) {
                // dead tail behind a HLT; nothing can branch into it
                log::debug!("pc {:04x}: skipping unreachable `{}`", ins.pc, ins);
                continue;
            }
            self.b.position_at_end(block);
            log::trace!("pc {:04x}: {}", ins.pc, ins);

            match ins.opcode {
                Opcode::Nop => {}
                Opcode::Hlt => self.lower_hlt(),
                Opcode::Add => self.lower_add(ins),
                Opcode::Sub => self.lower_sub(ins),
                Opcode::Nor => self.lower_nor(ins),
                Opcode::And => self.lower_and(ins),
                Opcode::Xor => self.lower_xor(ins),
                Opcode::Rsh => self.lower_rsh(ins),
                Opcode::Ldi => self.lower_ldi(ins),
                Opcode::Adi => self.lower_adi(ins),
                Opcode::Jmp => self.lower_jmp(ins)?,
                Opcode::Brh => self.lower_brh(ins)?,
                Opcode::Cal => self.lower_cal(ins)?,
                Opcode::Ret => self.lower_ret()?,
                Opcode::Lod => self.lower_lod(ins)?,
                Opcode::Str => self.lower_str(ins)?,
            }
        }

        self.close_open_blocks();

        let Translator {
            mut module,
            b,
            blocks,
            program,
            ..
        } = self;
        module.push_function(b.finish());
        module.verify()?;

        log::info!(
            "translated {} instructions into {} basic blocks",
            program.len(),
            blocks.len()
        );
        Ok(module)
    }

    /// Close every block the instruction walk left open (fall-through after
    /// RET/LOD/STR boundaries and the trailing block): branch to the next
    /// block in address order, or to exit for the last one.
    fn close_open_blocks(&mut self) {
        let ids: Vec<BlockId> = self.blocks.values().copied().collect();
        for (index, &id) in ids.iter().enumerate() {
            if self.b.is_terminated(id) {
                continue;
            }
            self.b.position_at_end(id);
            let next = ids.get(index + 1).copied().unwrap_or(self.exit);
            self.b.br(next);
        }
    }

    /// The block starting at `addr`
    fn block_at(&self, addr: u16) -> Result<BlockId> {
        self.blocks
            .get(&addr)
            .copied()
            .ok_or(RecompError::MissingBlock { addr })
    }

    /// The block control falls into after the instruction at `pc`
    fn fallthrough_after(&self, pc: u16) -> BlockId {
        match self.flow.successor_after(pc) {
            Some(addr) => self.blocks[&addr],
            None => self.exit,
        }
    }

    /// Emit a read of a register cell
    fn load_reg(&mut self, reg: u8) -> Value {
        let cell = self.state.regs[reg as usize].clone();
        self.b.load(Type::I8, cell)
    }

    /// Emit a write to a register cell
    ///
    /// Register 0 is hardwired to zero: the write is suppressed at
    /// translation time and no store reaches the emitted program.
    fn store_reg(&mut self, reg: u8, value: Value) {
        if reg != 0 {
            let cell = self.state.regs[reg as usize].clone();
            self.b.store(value, cell);
        }
    }

    /// Emit the Z flag update: `flag_z = (result == 0)`
    fn set_zero_flag(&mut self, result: &Value) {
        let z = self.b.icmp(Pred::Eq, result.clone(), Value::const_i8(0));
        let cell = self.state.flag_z.clone();
        self.b.store(z, cell);
    }

    /// Emit the C flag update: `flag_c = (result pred lhs)`
    fn set_carry_flag(&mut self, pred: Pred, result: &Value, lhs: &Value) {
        let c = self.b.icmp(pred, result.clone(), lhs.clone());
        let cell = self.state.flag_c.clone();
        self.b.store(c, cell);
    }
}
