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

use super::Translator;
use crate::core::ir::{Pred, Value};
use crate::core::isa::Instruction;

impl Translator<'_> {
    // === Arithmetic Instructions ===

    /// ADD: 8-bit wrapping addition
    ///
    /// Operation: `reg_c = reg_a + reg_b`
    ///
    /// Flags: `Z = (result == 0)`; `C` is the carry out of bit 7, observable
    /// as the wrapped sum comparing below its left operand.
    pub(super) fn lower_add(&mut self, ins: &Instruction) {
        let lhs = self.load_reg(ins.reg_a);
        let rhs = self.load_reg(ins.reg_b);
        let sum = self.b.add(lhs.clone(), rhs);

        self.store_reg(ins.reg_c, sum.clone());
        self.set_zero_flag(&sum);
        self.set_carry_flag(Pred::Ult, &sum, &lhs);
    }

    /// SUB: 8-bit wrapping subtraction
    ///
    /// Operation: `reg_c = reg_a - reg_b`
    ///
    /// Flags: `Z = (result == 0)`; `C` follows the machine's no-borrow
    /// convention: set iff the subtrahend fit, i.e. `result <= reg_a`. The
    /// comparison must be `<=`, not `<`, so that a zero difference still
    /// reports no borrow.
    pub(super) fn lower_sub(&mut self, ins: &Instruction) {
        let lhs = self.load_reg(ins.reg_a);
        let rhs = self.load_reg(ins.reg_b);
        let diff = self.b.sub(lhs.clone(), rhs);

        self.store_reg(ins.reg_c, diff.clone());
        self.set_zero_flag(&diff);
        self.set_carry_flag(Pred::Ule, &diff, &lhs);
    }

    /// LDI: load immediate
    ///
    /// Operation: `reg_a = imm`. No flags. Loading into register 0 is a
    /// complete no-op.
    pub(super) fn lower_ldi(&mut self, ins: &Instruction) {
        if ins.reg_a == 0 {
            return;
        }
        self.store_reg(ins.reg_a, Value::const_i8(ins.imm));
    }

    /// ADI: add immediate
    ///
    /// Operation: `reg_a = reg_a + imm`
    ///
    /// Flags update like ADD. With register 0 as the target only the
    /// register write is suppressed; the flags still change.
    pub(super) fn lower_adi(&mut self, ins: &Instruction) {
        let lhs = self.load_reg(ins.reg_a);
        let sum = self.b.add(lhs.clone(), Value::const_i8(ins.imm));

        self.store_reg(ins.reg_a, sum.clone());
        self.set_zero_flag(&sum);
        self.set_carry_flag(Pred::Ult, &sum, &lhs);
    }
}
