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
use crate::core::ir::Value;
use crate::core::isa::Instruction;

impl Translator<'_> {
    // === Logical Instructions ===
    //
    // All four update only the Z flag; C is untouched.

    /// NOR: `reg_c = !(reg_a | reg_b)`
    pub(super) fn lower_nor(&mut self, ins: &Instruction) {
        let lhs = self.load_reg(ins.reg_a);
        let rhs = self.load_reg(ins.reg_b);
        let or = self.b.or_(lhs, rhs);
        let result = self.b.not_(or);

        self.store_reg(ins.reg_c, result.clone());
        self.set_zero_flag(&result);
    }

    /// AND: `reg_c = reg_a & reg_b`
    pub(super) fn lower_and(&mut self, ins: &Instruction) {
        let lhs = self.load_reg(ins.reg_a);
        let rhs = self.load_reg(ins.reg_b);
        let result = self.b.and_(lhs, rhs);

        self.store_reg(ins.reg_c, result.clone());
        self.set_zero_flag(&result);
    }

    /// XOR: `reg_c = reg_a ^ reg_b`
    pub(super) fn lower_xor(&mut self, ins: &Instruction) {
        let lhs = self.load_reg(ins.reg_a);
        let rhs = self.load_reg(ins.reg_b);
        let result = self.b.xor(lhs, rhs);

        self.store_reg(ins.reg_c, result.clone());
        self.set_zero_flag(&result);
    }

    /// RSH: `reg_c = reg_a >> 1`, logical shift
    pub(super) fn lower_rsh(&mut self, ins: &Instruction) {
        let lhs = self.load_reg(ins.reg_a);
        let result = self.b.lshr(lhs, Value::const_i8(1));

        self.store_reg(ins.reg_c, result.clone());
        self.set_zero_flag(&result);
    }
}
