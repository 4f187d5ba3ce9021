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

//! Function builder
//!
//! The builder owns a [`Function`] while it is being emitted. It keeps a
//! cursor on one basic block; instructions append at that block's end.
//! Misuse (emitting with no cursor, double-terminating a block) is a
//! translator bug and panics rather than producing a malformed function.

use super::{
    BinOp, Block, BlockId, ExternDecl, Function, Inst, Pred, TempDef, TempId, Terminator, Type,
    Value,
};

/// Block-positioned instruction builder
pub struct Builder {
    func: Function,
    cur: Option<BlockId>,
}

impl Builder {
    /// Start building a function
    ///
    /// # Arguments
    ///
    /// * `name` - Function name
    /// * `ret` - Return type
    pub fn new(name: impl Into<String>, ret: Type) -> Self {
        Self {
            func: Function {
                name: name.into(),
                ret,
                blocks: Vec::new(),
                temps: Vec::new(),
            },
            cur: None,
        }
    }

    /// Append a new, empty basic block
    pub fn append_block(&mut self, label: impl Into<String>) -> BlockId {
        let id = BlockId(self.func.blocks.len() as u32);
        self.func.blocks.push(Block {
            label: label.into(),
            insts: Vec::new(),
            term: None,
        });
        id
    }

    /// Move the cursor to the end of `block`
    pub fn position_at_end(&mut self, block: BlockId) {
        self.cur = Some(block);
    }

    /// Whether `block` already ends in a terminator
    pub fn is_terminated(&self, block: BlockId) -> bool {
        self.func.blocks[block.index()].term.is_some()
    }

    /// Finish building and hand the function over
    pub fn finish(self) -> Function {
        self.func
    }

    fn new_temp(&mut self, name: Option<String>, ty: Type) -> TempId {
        let id = TempId(self.func.temps.len() as u32);
        self.func.temps.push(TempDef { name, ty });
        id
    }

    fn push(&mut self, inst: Inst) {
        let cur = self.cur.expect("builder is not positioned at a block");
        let block = &mut self.func.blocks[cur.index()];
        debug_assert!(
            block.term.is_none(),
            "emitting into terminated block {}",
            block.label
        );
        block.insts.push(inst);
    }

    fn terminate(&mut self, term: Terminator) {
        let cur = self.cur.expect("builder is not positioned at a block");
        let block = &mut self.func.blocks[cur.index()];
        debug_assert!(
            block.term.is_none(),
            "second terminator for block {}",
            block.label
        );
        block.term = Some(term);
    }

    /// Reserve a named stack cell; the result points to it
    pub fn alloca(&mut self, name: &str, ty: Type) -> Value {
        let dst = self.new_temp(Some(name.to_string()), Type::Ptr);
        self.push(Inst::Alloca { dst, ty });
        Value::Temp(dst)
    }

    /// Load a `ty` value through `ptr`
    pub fn load(&mut self, ty: Type, ptr: Value) -> Value {
        let dst = self.new_temp(None, ty.clone());
        self.push(Inst::Load { dst, ty, ptr });
        Value::Temp(dst)
    }

    /// Store `val` through `ptr`
    pub fn store(&mut self, val: Value, ptr: Value) {
        self.push(Inst::Store { val, ptr });
    }

    /// Address of array element `index` within the array at `base`
    pub fn gep(&mut self, base_ty: Type, base: Value, index: Value) -> Value {
        debug_assert!(matches!(base_ty, Type::Array(..)));
        let dst = self.new_temp(None, Type::Ptr);
        self.push(Inst::Gep {
            dst,
            base_ty,
            base,
            index,
        });
        Value::Temp(dst)
    }

    fn bin(&mut self, op: BinOp, lhs: Value, rhs: Value) -> Value {
        let ty = self.func.value_type(&lhs);
        debug_assert_eq!(ty, self.func.value_type(&rhs));
        let dst = self.new_temp(None, ty);
        self.push(Inst::Bin { dst, op, lhs, rhs });
        Value::Temp(dst)
    }

    /// Wrapping addition at the operand width
    pub fn add(&mut self, lhs: Value, rhs: Value) -> Value {
        self.bin(BinOp::Add, lhs, rhs)
    }

    /// Wrapping subtraction at the operand width
    pub fn sub(&mut self, lhs: Value, rhs: Value) -> Value {
        self.bin(BinOp::Sub, lhs, rhs)
    }

    pub fn and_(&mut self, lhs: Value, rhs: Value) -> Value {
        self.bin(BinOp::And, lhs, rhs)
    }

    pub fn or_(&mut self, lhs: Value, rhs: Value) -> Value {
        self.bin(BinOp::Or, lhs, rhs)
    }

    pub fn xor(&mut self, lhs: Value, rhs: Value) -> Value {
        self.bin(BinOp::Xor, lhs, rhs)
    }

    /// Logical right shift
    pub fn lshr(&mut self, lhs: Value, rhs: Value) -> Value {
        self.bin(BinOp::Lshr, lhs, rhs)
    }

    /// Bitwise complement, spelled as `xor` with all ones
    pub fn not_(&mut self, value: Value) -> Value {
        let ty = self.func.value_type(&value);
        let ones = match ty.bit_width() {
            Some(w) if w < 64 => (1u64 << w) - 1,
            _ => u64::MAX,
        };
        let all_ones = Value::Const(ty, ones);
        self.bin(BinOp::Xor, value, all_ones)
    }

    /// Unsigned comparison producing an i1
    pub fn icmp(&mut self, pred: Pred, lhs: Value, rhs: Value) -> Value {
        let dst = self.new_temp(None, Type::I1);
        self.push(Inst::Icmp { dst, pred, lhs, rhs });
        Value::Temp(dst)
    }

    /// Call an external function; returns the result value unless void
    pub fn call(&mut self, decl: &ExternDecl, args: Vec<Value>) -> Option<Value> {
        debug_assert_eq!(decl.params.len(), args.len());
        let dst = if decl.ret == Type::Void {
            None
        } else {
            Some(self.new_temp(None, decl.ret.clone()))
        };
        self.push(Inst::Call {
            dst,
            callee: decl.name.clone(),
            args,
        });
        dst.map(Value::Temp)
    }

    /// Unconditional branch terminator
    pub fn br(&mut self, dest: BlockId) {
        self.terminate(Terminator::Br(dest));
    }

    /// Conditional branch terminator
    pub fn cond_br(&mut self, cond: Value, then_dest: BlockId, else_dest: BlockId) {
        self.terminate(Terminator::CondBr {
            cond,
            then_dest,
            else_dest,
        });
    }

    /// Multi-way switch terminator
    pub fn switch(&mut self, value: Value, default: BlockId, cases: Vec<(u64, BlockId)>) {
        self.terminate(Terminator::Switch {
            value,
            default,
            cases,
        });
    }

    /// Return terminator
    pub fn ret(&mut self, value: Value) {
        self.terminate(Terminator::Ret(value));
    }
}
