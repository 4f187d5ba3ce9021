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

//! Control-flow recovery
//!
//! One pass over the decoded program collects every address that can begin
//! a basic block:
//!
//! - address 0 (the entry point),
//! - jump, branch and call targets,
//! - the instruction after every branch, call, return, load and store.
//!
//! Call-return sites are kept separately: the RET lowering switches over
//! exactly this set, so a return address that never followed a CAL is a
//! runtime error rather than a reachable block.

use std::collections::BTreeSet;

use super::isa::{Instruction, Opcode};

/// Block-start and transfer-target sets for one program
#[derive(Debug, Clone)]
pub struct FlowMap {
    branch_targets: BTreeSet<u16>,
    return_targets: BTreeSet<u16>,
    /// Sorted union `{0} ∪ branch_targets ∪ return_targets`
    starts: Vec<u16>,
}

impl FlowMap {
    /// Scan a program and compute its flow map
    ///
    /// # Arguments
    ///
    /// * `program` - The decoded code array
    pub fn analyze(program: &[Instruction]) -> Self {
        let mut branch_targets = BTreeSet::new();
        let mut return_targets = BTreeSet::new();

        for ins in program {
            let next = ins.pc + 1;
            match ins.opcode {
                Opcode::Jmp | Opcode::Brh => {
                    branch_targets.insert(ins.addr);
                    branch_targets.insert(next);
                }
                Opcode::Cal => {
                    branch_targets.insert(ins.addr);
                    return_targets.insert(next);
                }
                Opcode::Ret | Opcode::Lod | Opcode::Str => {
                    branch_targets.insert(next);
                }
                _ => {}
            }
        }

        let mut all = BTreeSet::new();
        all.insert(0);
        all.extend(&branch_targets);
        all.extend(&return_targets);
        let starts: Vec<u16> = all.into_iter().collect();

        log::debug!(
            "flow analysis: {} blocks, {} branch targets, {} return targets",
            starts.len(),
            branch_targets.len(),
            return_targets.len()
        );

        Self {
            branch_targets,
            return_targets,
            starts,
        }
    }

    /// Sorted block-start addresses
    pub fn block_starts(&self) -> &[u16] {
        &self.starts
    }

    /// Addresses reachable by a direct jump or branch
    pub fn branch_targets(&self) -> &BTreeSet<u16> {
        &self.branch_targets
    }

    /// Addresses reachable by a hardware return (instruction after a CAL)
    pub fn return_targets(&self) -> &BTreeSet<u16> {
        &self.return_targets
    }

    /// Whether `addr` starts a block
    pub fn covers(&self, addr: u16) -> bool {
        self.starts.binary_search(&addr).is_ok()
    }

    /// The start address of the block containing `pc`
    ///
    /// This is the greatest block start not exceeding `pc`; straight-line
    /// runs of instructions between boundaries all map to the same block.
    pub fn containing_block(&self, pc: u16) -> u16 {
        let idx = self.starts.partition_point(|&start| start <= pc);
        // starts[0] == 0, so idx >= 1 for any pc
        self.starts[idx - 1]
    }

    /// The first block start strictly after `pc`, if any
    pub fn successor_after(&self, pc: u16) -> Option<u16> {
        let idx = self.starts.partition_point(|&start| start <= pc);
        self.starts.get(idx).copied()
    }
}
