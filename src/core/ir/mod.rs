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

//! Typed SSA intermediate representation
//!
//! A small IR in the shape consumed by ahead-of-time compiler backends:
//! a module of external declarations and functions, each function a list of
//! labeled basic blocks ending in exactly one terminator. Instructions
//! produce typed SSA temporaries; machine state lives in stack cells
//! created by `alloca`.
//!
//! The textual rendering (see [`Module`]'s `Display` impl in `display`)
//! follows LLVM assembly syntax so the output can be handed to an LLVM-style
//! toolchain together with the I/O runtime.

mod builder;
mod display;

pub use builder::Builder;

use super::error::{RecompError, Result};

/// IR value types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// No value (function returns only)
    Void,
    /// 1-bit integer (flags, conditions)
    I1,
    /// 8-bit integer (registers, RAM cells)
    I8,
    /// 16-bit integer (return addresses)
    I16,
    /// 32-bit integer (process exit status)
    I32,
    /// Fixed-length array of an element type
    Array(Box<Type>, u32),
    /// Opaque pointer to a stack cell
    Ptr,
}

impl Type {
    /// Shorthand for an array type
    pub fn array(elem: Type, len: u32) -> Type {
        Type::Array(Box::new(elem), len)
    }

    /// Bit width of an integer type, if it is one
    pub fn bit_width(&self) -> Option<u32> {
        match self {
            Type::I1 => Some(1),
            Type::I8 => Some(8),
            Type::I16 => Some(16),
            Type::I32 => Some(32),
            _ => None,
        }
    }
}

/// Handle to an SSA temporary within one function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempId(u32);

impl TempId {
    /// Index into the function's temporary table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a basic block within one function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

impl BlockId {
    /// Index into the function's block list
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An IR operand
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Typed integer constant
    Const(Type, u64),
    /// All-zero aggregate constant (array initialization)
    Zero(Type),
    /// Reference to an SSA temporary
    Temp(TempId),
}

impl Value {
    pub fn const_i1(v: bool) -> Value {
        Value::Const(Type::I1, u64::from(v))
    }

    pub fn const_i8(v: u8) -> Value {
        Value::Const(Type::I8, u64::from(v))
    }

    pub fn const_i16(v: u16) -> Value {
        Value::Const(Type::I16, u64::from(v))
    }

    pub fn const_i32(v: i32) -> Value {
        Value::Const(Type::I32, v as u32 as u64)
    }
}

/// Integer binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
    /// Logical right shift
    Lshr,
}

/// Unsigned integer comparison predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pred {
    Eq,
    Ne,
    Ult,
    Ule,
    Ugt,
}

/// A non-terminator instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    /// Reserve a stack cell of `ty`; `dst` is a pointer to it
    Alloca { dst: TempId, ty: Type },
    /// Read a `ty` value through `ptr`
    Load { dst: TempId, ty: Type, ptr: Value },
    /// Write `val` through `ptr`
    Store { val: Value, ptr: Value },
    /// Address of element `index` of the `base_ty` array at `base`
    Gep {
        dst: TempId,
        base_ty: Type,
        base: Value,
        index: Value,
    },
    /// `dst = lhs op rhs`, wrapping at the operand width
    Bin {
        dst: TempId,
        op: BinOp,
        lhs: Value,
        rhs: Value,
    },
    /// `dst = (lhs pred rhs)` as an i1
    Icmp {
        dst: TempId,
        pred: Pred,
        lhs: Value,
        rhs: Value,
    },
    /// Call an external runtime function
    Call {
        dst: Option<TempId>,
        callee: String,
        args: Vec<Value>,
    },
}

/// A block terminator
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    /// Unconditional branch
    Br(BlockId),
    /// Two-way branch on an i1
    CondBr {
        cond: Value,
        then_dest: BlockId,
        else_dest: BlockId,
    },
    /// Multi-way branch on an integer value
    Switch {
        value: Value,
        default: BlockId,
        cases: Vec<(u64, BlockId)>,
    },
    /// Return from the function
    Ret(Value),
}

/// Definition record of an SSA temporary
#[derive(Debug, Clone, PartialEq)]
pub struct TempDef {
    /// Stable name for allocas; anonymous temporaries print as `%tN`
    pub name: Option<String>,
    /// Result type
    pub ty: Type,
}

/// A labeled basic block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    label: String,
    insts: Vec<Inst>,
    term: Option<Terminator>,
}

impl Block {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    /// The terminator, if the block has been closed
    pub fn term(&self) -> Option<&Terminator> {
        self.term.as_ref()
    }
}

/// A function under or after construction
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    ret: Type,
    blocks: Vec<Block>,
    temps: Vec<TempDef>,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ret(&self) -> &Type {
        &self.ret
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn temp(&self, id: TempId) -> &TempDef {
        &self.temps[id.index()]
    }

    pub fn temps(&self) -> &[TempDef] {
        &self.temps
    }

    /// The type of an operand in this function's scope
    pub fn value_type(&self, value: &Value) -> Type {
        match value {
            Value::Const(ty, _) => ty.clone(),
            Value::Zero(ty) => ty.clone(),
            Value::Temp(id) => self.temp(*id).ty.clone(),
        }
    }
}

/// Declaration of an external runtime function
#[derive(Debug, Clone, PartialEq)]
pub struct ExternDecl {
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
}

/// An IR module: external declarations plus functions
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: String,
    externals: Vec<ExternDecl>,
    functions: Vec<Function>,
}

impl Module {
    /// Create an empty module
    ///
    /// # Arguments
    ///
    /// * `name` - Module identifier, conventionally the input file name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            externals: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare an external function and return its declaration record
    pub fn declare_external(
        &mut self,
        name: impl Into<String>,
        params: Vec<Type>,
        ret: Type,
    ) -> ExternDecl {
        let decl = ExternDecl {
            name: name.into(),
            params,
            ret,
        };
        self.externals.push(decl.clone());
        decl
    }

    pub fn externals(&self) -> &[ExternDecl] {
        &self.externals
    }

    pub fn push_function(&mut self, func: Function) {
        self.functions.push(func);
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Check module well-formedness
    ///
    /// Every block must end in exactly one terminator, every branch target
    /// must name an existing block, and `ret` values must match the
    /// function's return type. A failure here is a translator bug surfaced
    /// before the module text leaves the process.
    pub fn verify(&self) -> Result<()> {
        for func in &self.functions {
            let block_count = func.blocks.len();
            let check_target = |id: BlockId, label: &str| -> Result<()> {
                if id.index() >= block_count {
                    return Err(RecompError::UnterminatedBlock {
                        label: format!("{} (dangling branch target)", label),
                    });
                }
                Ok(())
            };

            for block in &func.blocks {
                match &block.term {
                    None => {
                        return Err(RecompError::UnterminatedBlock {
                            label: block.label.clone(),
                        })
                    }
                    Some(Terminator::Br(dest)) => check_target(*dest, &block.label)?,
                    Some(Terminator::CondBr {
                        then_dest,
                        else_dest,
                        ..
                    }) => {
                        check_target(*then_dest, &block.label)?;
                        check_target(*else_dest, &block.label)?;
                    }
                    Some(Terminator::Switch { default, cases, .. }) => {
                        check_target(*default, &block.label)?;
                        for (_, dest) in cases {
                            check_target(*dest, &block.label)?;
                        }
                    }
                    Some(Terminator::Ret(value)) => {
                        if func.value_type(value) != func.ret {
                            return Err(RecompError::UnterminatedBlock {
                                label: format!("{} (return type mismatch)", block.label),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
