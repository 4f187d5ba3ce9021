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

//! Textual serialization of IR modules
//!
//! Renders a module in LLVM assembly syntax (opaque pointers). The dump is
//! the recompiler's output artifact.

use std::fmt;

use super::{BinOp, Block, Function, Inst, Module, Pred, TempId, Terminator, Type, Value};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::I1 => write!(f, "i1"),
            Type::I8 => write!(f, "i8"),
            Type::I16 => write!(f, "i16"),
            Type::I32 => write!(f, "i32"),
            Type::Array(elem, len) => write!(f, "[{} x {}]", len, elem),
            Type::Ptr => write!(f, "ptr"),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Lshr => "lshr",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pred::Eq => "eq",
            Pred::Ne => "ne",
            Pred::Ult => "ult",
            Pred::Ule => "ule",
            Pred::Ugt => "ugt",
        };
        write!(f, "{}", name)
    }
}

fn temp_name(func: &Function, id: TempId) -> String {
    match &func.temp(id).name {
        Some(name) => format!("%{}", name),
        None => format!("%t{}", id.index()),
    }
}

fn value_text(func: &Function, value: &Value) -> String {
    match value {
        Value::Const(Type::I1, bits) => {
            if *bits != 0 { "true" } else { "false" }.to_string()
        }
        Value::Const(_, bits) => format!("{}", bits),
        Value::Zero(_) => "zeroinitializer".to_string(),
        Value::Temp(id) => temp_name(func, *id),
    }
}

/// A value prefixed with its type, as LLVM operand lists want it
fn typed_value_text(func: &Function, value: &Value) -> String {
    format!("{} {}", func.value_type(value), value_text(func, value))
}

fn label_text(func: &Function, id: super::BlockId) -> String {
    format!("%{}", func.block(id).label())
}

fn write_inst(f: &mut fmt::Formatter<'_>, func: &Function, inst: &Inst) -> fmt::Result {
    match inst {
        Inst::Alloca { dst, ty } => {
            writeln!(f, "  {} = alloca {}", temp_name(func, *dst), ty)
        }
        Inst::Load { dst, ty, ptr } => writeln!(
            f,
            "  {} = load {}, ptr {}",
            temp_name(func, *dst),
            ty,
            value_text(func, ptr)
        ),
        Inst::Store { val, ptr } => writeln!(
            f,
            "  store {}, ptr {}",
            typed_value_text(func, val),
            value_text(func, ptr)
        ),
        Inst::Gep {
            dst,
            base_ty,
            base,
            index,
        } => writeln!(
            f,
            "  {} = getelementptr inbounds {}, ptr {}, i32 0, {}",
            temp_name(func, *dst),
            base_ty,
            value_text(func, base),
            typed_value_text(func, index)
        ),
        Inst::Bin { dst, op, lhs, rhs } => writeln!(
            f,
            "  {} = {} {}, {}",
            temp_name(func, *dst),
            op,
            typed_value_text(func, lhs),
            value_text(func, rhs)
        ),
        Inst::Icmp {
            dst,
            pred,
            lhs,
            rhs,
        } => writeln!(
            f,
            "  {} = icmp {} {}, {}",
            temp_name(func, *dst),
            pred,
            typed_value_text(func, lhs),
            value_text(func, rhs)
        ),
        Inst::Call { dst, callee, args } => {
            let args = args
                .iter()
                .map(|a| typed_value_text(func, a))
                .collect::<Vec<_>>()
                .join(", ");
            match dst {
                Some(dst) => writeln!(
                    f,
                    "  {} = call {} @{}({})",
                    temp_name(func, *dst),
                    func.temp(*dst).ty,
                    callee,
                    args
                ),
                None => writeln!(f, "  call void @{}({})", callee, args),
            }
        }
    }
}

fn write_terminator(f: &mut fmt::Formatter<'_>, func: &Function, term: &Terminator) -> fmt::Result {
    match term {
        Terminator::Br(dest) => writeln!(f, "  br label {}", label_text(func, *dest)),
        Terminator::CondBr {
            cond,
            then_dest,
            else_dest,
        } => writeln!(
            f,
            "  br i1 {}, label {}, label {}",
            value_text(func, cond),
            label_text(func, *then_dest),
            label_text(func, *else_dest)
        ),
        Terminator::Switch {
            value,
            default,
            cases,
        } => {
            let ty = func.value_type(value);
            writeln!(
                f,
                "  switch {} {}, label {} [",
                ty,
                value_text(func, value),
                label_text(func, *default)
            )?;
            for (case, dest) in cases {
                writeln!(f, "    {} {}, label {}", ty, case, label_text(func, *dest))?;
            }
            writeln!(f, "  ]")
        }
        Terminator::Ret(value) => writeln!(f, "  ret {}", typed_value_text(func, value)),
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, func: &Function, block: &Block) -> fmt::Result {
    writeln!(f, "{}:", block.label())?;
    for inst in block.insts() {
        write_inst(f, func, inst)?;
    }
    if let Some(term) = block.term() {
        write_terminator(f, func, term)?;
    }
    Ok(())
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name())?;
        writeln!(f, "source_filename = \"{}\"", self.name())?;
        writeln!(f)?;

        for decl in self.externals() {
            let params = decl
                .params
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "declare {} @{}({})", decl.ret, decl.name, params)?;
        }

        for func in self.functions() {
            writeln!(f)?;
            writeln!(f, "define {} @{}() {{", func.ret(), func.name())?;
            for (index, block) in func.blocks().iter().enumerate() {
                if index > 0 {
                    writeln!(f)?;
                }
                write_block(f, func, block)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}
