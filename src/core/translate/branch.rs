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

use super::{stack_type, Translator};
use crate::core::error::Result;
use crate::core::ir::{Pred, Type, Value};
use crate::core::isa::{Condition, Instruction};

impl Translator<'_> {
    // === Control Flow Instructions ===

    /// HLT: branch to the exit block
    ///
    /// The exit block owns the deinit call and the status-0 return, so a
    /// program with several HLTs still shuts the runtime down once.
    pub(super) fn lower_hlt(&mut self) {
        let exit = self.exit;
        self.b.br(exit);
    }

    /// JMP: unconditional branch to `addr`
    pub(super) fn lower_jmp(&mut self, ins: &Instruction) -> Result<()> {
        let target = self.block_at(ins.addr)?;
        self.b.br(target);
        Ok(())
    }

    /// BRH: conditional branch on a machine flag
    ///
    /// Taken edge goes to `addr`, the fall-through edge to `pc+1`.
    pub(super) fn lower_brh(&mut self, ins: &Instruction) -> Result<()> {
        let (cell, pred) = match ins.cond {
            Condition::Zero => (self.state.flag_z.clone(), Pred::Eq),
            Condition::NotZero => (self.state.flag_z.clone(), Pred::Ne),
            Condition::Carry => (self.state.flag_c.clone(), Pred::Eq),
            Condition::NotCarry => (self.state.flag_c.clone(), Pred::Ne),
        };
        let flag = self.b.load(Type::I1, cell);
        let taken = self.b.icmp(pred, flag, Value::const_i1(true));

        let then_dest = self.block_at(ins.addr)?;
        let else_dest = self.block_at(ins.pc + 1)?;
        self.b.cond_br(taken, then_dest, else_dest);
        Ok(())
    }

    /// CAL: push the return address and branch to `addr`
    ///
    /// The call stack is machine state, not the host stack: `stack[sp]`
    /// receives `pc+1` as a 16-bit word and `sp` grows by one.
    pub(super) fn lower_cal(&mut self, ins: &Instruction) -> Result<()> {
        let target = self.block_at(ins.addr)?;

        let sp_cell = self.state.sp.clone();
        let stack = self.state.stack.clone();
        let sp = self.b.load(Type::I8, sp_cell.clone());
        let slot = self.b.gep(stack_type(), stack, sp.clone());
        self.b.store(Value::const_i16(ins.pc + 1), slot);

        let bumped = self.b.add(sp, Value::const_i8(1));
        self.b.store(bumped, sp_cell);

        self.b.br(target);
        Ok(())
    }

    /// RET: pop the return address and switch to the matching block
    ///
    /// The switch covers exactly the known return sites (instructions
    /// following a CAL). A popped value outside that set means the program
    /// returned without a matching call; the default edge routes to the
    /// trap block.
    pub(super) fn lower_ret(&mut self) -> Result<()> {
        let sp_cell = self.state.sp.clone();
        let stack = self.state.stack.clone();
        let sp = self.b.load(Type::I8, sp_cell.clone());
        let popped = self.b.sub(sp, Value::const_i8(1));
        self.b.store(popped.clone(), sp_cell);

        let slot = self.b.gep(stack_type(), stack, popped);
        let ret_addr = self.b.load(Type::I16, slot);

        let targets: Vec<u16> = self.flow.return_targets().iter().copied().collect();
        let mut cases = Vec::with_capacity(targets.len());
        for addr in targets {
            cases.push((u64::from(addr), self.block_at(addr)?));
        }

        let trap = self.trap;
        self.b.switch(ret_addr, trap, cases);
        Ok(())
    }
}
