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

//! Custom assertions over evaluation results

use super::eval::Evaluation;

/// Assert a register's final value
#[allow(dead_code)]
pub fn assert_reg(eval: &Evaluation, reg: u8, expected: u8) {
    let actual = eval.reg(reg);
    assert_eq!(
        actual, expected,
        "register r{} mismatch: expected {}, got {}",
        reg, expected, actual
    );
}

/// Assert the final Z and C flags
#[allow(dead_code)]
pub fn assert_flags(eval: &Evaluation, z: bool, c: bool) {
    assert_eq!(
        eval.flag_z(),
        z,
        "flag Z mismatch: expected {}, got {}",
        z,
        eval.flag_z()
    );
    assert_eq!(
        eval.flag_c(),
        c,
        "flag C mismatch: expected {}, got {}",
        c,
        eval.flag_c()
    );
}

/// Assert the process exit code
#[allow(dead_code)]
pub fn assert_exit(eval: &Evaluation, expected: i32) {
    assert_eq!(
        eval.exit_code, expected,
        "exit code mismatch: expected {}, got {}",
        expected, eval.exit_code
    );
}
