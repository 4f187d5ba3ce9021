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

//! Deterministic evaluator for emitted modules
//!
//! Walks the entry function block by block, keeping every alloca as a cell
//! array and every external call as a recorded event. This is the test
//! suite's stand-in for compiling the IR and linking the real runtime:
//! scenarios assert on the final machine state and the call trace.

use std::collections::HashMap;

use batpu_recomp::core::ir::{BinOp, Inst, Module, Pred, Terminator, Type, Value};

/// One recorded external call
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Event {
    Init,
    Deinit,
    RaiseError,
    DrawPixel(u8, u8),
    ClearPixel(u8, u8),
    UpdateScreen,
    ClearScreen,
    GetPixel(u8, u8),
    PushChar(u8),
    FlushCharBuffer,
    ClearCharBuffer,
    SetNum(u8),
    SetSignedness(bool),
    WriteNum,
    GetController,
    GetRandomNum,
}

/// Recording runtime stub with fixed input values
#[derive(Debug, Default)]
pub struct StubRuntime {
    pub events: Vec<Event>,
    /// Returned by `get_pixel`
    pub pixel: u8,
    /// Returned by `get_controller`
    pub controller: u8,
    /// Returned by `get_random_num`
    pub random: u8,
}

impl StubRuntime {
    fn call(&mut self, name: &str, args: &[u64]) -> u64 {
        let arg = |i: usize| args[i] as u8;
        match name {
            "init" | "init_headless" => {
                self.events.push(Event::Init);
                0
            }
            "deinit" | "deinit_headless" => {
                self.events.push(Event::Deinit);
                0
            }
            "raise_error" => {
                self.events.push(Event::RaiseError);
                0
            }
            "draw_pixel" => {
                self.events.push(Event::DrawPixel(arg(0), arg(1)));
                0
            }
            "clear_pixel" => {
                self.events.push(Event::ClearPixel(arg(0), arg(1)));
                0
            }
            "update_screen" => {
                self.events.push(Event::UpdateScreen);
                0
            }
            "clear_screen" => {
                self.events.push(Event::ClearScreen);
                0
            }
            "get_pixel" => {
                self.events.push(Event::GetPixel(arg(0), arg(1)));
                u64::from(self.pixel)
            }
            "push_char" => {
                self.events.push(Event::PushChar(arg(0)));
                0
            }
            "flush_char_buffer" => {
                self.events.push(Event::FlushCharBuffer);
                0
            }
            "clear_char_buffer" => {
                self.events.push(Event::ClearCharBuffer);
                0
            }
            "set_num" => {
                self.events.push(Event::SetNum(arg(0)));
                0
            }
            "set_signedness" => {
                self.events.push(Event::SetSignedness(args[0] != 0));
                0
            }
            "write_num" => {
                self.events.push(Event::WriteNum);
                0
            }
            "get_controller" => {
                self.events.push(Event::GetController);
                u64::from(self.controller)
            }
            "get_random_num" => {
                self.events.push(Event::GetRandomNum);
                u64::from(self.random)
            }
            other => panic!("call to undeclared external {}", other),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Val {
    Int(u64),
    Ptr { slot: usize, index: usize },
}

impl Val {
    fn int(self) -> u64 {
        match self {
            Val::Int(v) => v,
            Val::Ptr { .. } => panic!("expected an integer, found a pointer"),
        }
    }

    fn ptr(self) -> (usize, usize) {
        match self {
            Val::Ptr { slot, index } => (slot, index),
            Val::Int(_) => panic!("expected a pointer, found an integer"),
        }
    }
}

fn mask(ty: &Type, value: u64) -> u64 {
    match ty.bit_width() {
        Some(width) if width < 64 => value & ((1u64 << width) - 1),
        _ => value,
    }
}

/// Observable outcome of one evaluation
#[derive(Debug)]
pub struct Evaluation {
    pub exit_code: i32,
    pub runtime: StubRuntime,
    cells: Vec<Vec<u64>>,
    names: HashMap<String, usize>,
}

#[allow(dead_code)]
impl Evaluation {
    fn cell(&self, name: &str, index: usize) -> u64 {
        let slot = *self
            .names
            .get(name)
            .unwrap_or_else(|| panic!("no machine cell named {}", name));
        self.cells[slot][index]
    }

    /// Final value of a register cell
    pub fn reg(&self, reg: u8) -> u8 {
        self.cell(&format!("reg_{}", reg), 0) as u8
    }

    pub fn flag_z(&self) -> bool {
        self.cell("flag_z", 0) != 0
    }

    pub fn flag_c(&self) -> bool {
        self.cell("flag_c", 0) != 0
    }

    pub fn ram(&self, addr: u8) -> u8 {
        self.cell("ram", addr as usize) as u8
    }

    pub fn sp(&self) -> u8 {
        self.cell("sp", 0) as u8
    }

    pub fn pixel_x(&self) -> u8 {
        self.cell("pixel_x", 0) as u8
    }

    pub fn pixel_y(&self) -> u8 {
        self.cell("pixel_y", 0) as u8
    }

    pub fn events(&self) -> &[Event] {
        &self.runtime.events
    }
}

/// Evaluate a module's entry function against a fresh stub
#[allow(dead_code)]
pub fn run_module(module: &Module) -> Evaluation {
    run_module_with(module, StubRuntime::default())
}

/// Evaluate a module's entry function against the given stub
///
/// Panics on a malformed module (the translator is expected to have
/// verified it) and after a generous step limit, so a wrong branch target
/// shows up as a test failure instead of a hang.
pub fn run_module_with(module: &Module, mut runtime: StubRuntime) -> Evaluation {
    let func = module
        .functions()
        .iter()
        .find(|f| f.name() == "main")
        .expect("module has no main function");

    let mut temps: Vec<Option<Val>> = vec![None; func.temps().len()];
    let mut cells: Vec<Vec<u64>> = Vec::new();
    let mut names: HashMap<String, usize> = HashMap::new();

    let eval = |temps: &[Option<Val>], value: &Value| -> Val {
        match value {
            Value::Const(ty, bits) => Val::Int(mask(ty, *bits)),
            Value::Zero(_) => Val::Int(0),
            Value::Temp(id) => temps[id.index()].expect("use of undefined temporary"),
        }
    };

    let mut block = 0usize;
    let mut steps = 0u64;
    let exit_code = loop {
        steps += 1;
        assert!(steps < 1_000_000, "step limit exceeded; runaway control flow");

        let blk = &func.blocks()[block];
        for inst in blk.insts() {
            match inst {
                Inst::Alloca { dst, ty } => {
                    let len = match ty {
                        Type::Array(_, len) => *len as usize,
                        _ => 1,
                    };
                    let slot = cells.len();
                    cells.push(vec![0; len]);
                    if let Some(name) = &func.temp(*dst).name {
                        names.insert(name.clone(), slot);
                    }
                    temps[dst.index()] = Some(Val::Ptr { slot, index: 0 });
                }
                Inst::Load { dst, ty, ptr } => {
                    let (slot, index) = eval(&temps, ptr).ptr();
                    temps[dst.index()] = Some(Val::Int(mask(ty, cells[slot][index])));
                }
                Inst::Store { val, ptr } => {
                    let (slot, index) = eval(&temps, ptr).ptr();
                    if matches!(val, Value::Zero(_)) {
                        cells[slot].iter_mut().for_each(|c| *c = 0);
                    } else {
                        let ty = func.value_type(val);
                        cells[slot][index] = mask(&ty, eval(&temps, val).int());
                    }
                }
                Inst::Gep {
                    dst, base, index, ..
                } => {
                    let (slot, base_index) = eval(&temps, base).ptr();
                    let offset = eval(&temps, index).int() as usize;
                    temps[dst.index()] = Some(Val::Ptr {
                        slot,
                        index: base_index + offset,
                    });
                }
                Inst::Bin { dst, op, lhs, rhs } => {
                    let a = eval(&temps, lhs).int();
                    let b = eval(&temps, rhs).int();
                    let raw = match op {
                        BinOp::Add => a.wrapping_add(b),
                        BinOp::Sub => a.wrapping_sub(b),
                        BinOp::And => a & b,
                        BinOp::Or => a | b,
                        BinOp::Xor => a ^ b,
                        BinOp::Lshr => a >> b,
                    };
                    let ty = &func.temp(*dst).ty;
                    temps[dst.index()] = Some(Val::Int(mask(ty, raw)));
                }
                Inst::Icmp {
                    dst,
                    pred,
                    lhs,
                    rhs,
                } => {
                    let a = eval(&temps, lhs).int();
                    let b = eval(&temps, rhs).int();
                    let result = match pred {
                        Pred::Eq => a == b,
                        Pred::Ne => a != b,
                        Pred::Ult => a < b,
                        Pred::Ule => a <= b,
                        Pred::Ugt => a > b,
                    };
                    temps[dst.index()] = Some(Val::Int(u64::from(result)));
                }
                Inst::Call { dst, callee, args } => {
                    let arg_values: Vec<u64> =
                        args.iter().map(|a| eval(&temps, a).int()).collect();
                    let result = runtime.call(callee, &arg_values);
                    if let Some(dst) = dst {
                        let ty = &func.temp(*dst).ty;
                        temps[dst.index()] = Some(Val::Int(mask(ty, result)));
                    }
                }
            }
        }

        match blk.term().expect("unterminated block reached") {
            Terminator::Br(dest) => block = dest.index(),
            Terminator::CondBr {
                cond,
                then_dest,
                else_dest,
            } => {
                block = if eval(&temps, cond).int() != 0 {
                    then_dest.index()
                } else {
                    else_dest.index()
                };
            }
            Terminator::Switch {
                value,
                default,
                cases,
            } => {
                let v = eval(&temps, value).int();
                block = cases
                    .iter()
                    .find(|(case, _)| *case == v)
                    .map(|(_, dest)| dest.index())
                    .unwrap_or_else(|| default.index());
            }
            Terminator::Ret(value) => break eval(&temps, value).int() as i32,
        }
    };

    Evaluation {
        exit_code,
        runtime,
        cells,
        names,
    }
}
