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

//! Runtime interface declarations
//!
//! The emitted program calls a small runtime library for I/O: a pixel
//! surface, a character buffer, a numeric display, controller input and a
//! random number source. This module declares those externals into a module
//! and hands the translator typed handles for emitting calls.
//!
//! In headless mode the graphics surface and controller do not exist:
//! `init`/`deinit` swap for their `_headless` variants, the graphics and
//! controller externals are not declared, and the translator lowers their
//! uses to constants or nothing.

use super::ir::{ExternDecl, Module, Type};

/// Lowering mode for I/O externals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full runtime with graphics surface and controller
    Native,
    /// No graphics surface, no controller
    Headless,
}

/// Graphics surface externals (absent in headless mode)
pub struct Graphics {
    pub draw_pixel: ExternDecl,
    pub clear_pixel: ExternDecl,
    pub get_pixel: ExternDecl,
    pub update_screen: ExternDecl,
    pub clear_screen: ExternDecl,
}

/// Handles to the declared runtime externals
pub struct Runtime {
    mode: Mode,
    init: ExternDecl,
    deinit: ExternDecl,
    raise_error: ExternDecl,
    graphics: Option<Graphics>,
    push_char: ExternDecl,
    flush_char_buffer: ExternDecl,
    clear_char_buffer: ExternDecl,
    set_num: ExternDecl,
    set_signedness: ExternDecl,
    write_num: ExternDecl,
    get_controller: Option<ExternDecl>,
    get_random_num: ExternDecl,
}

impl Runtime {
    /// Declare the runtime externals for `mode` into `module`
    pub fn declare(module: &mut Module, mode: Mode) -> Self {
        let void = || Type::Void;
        let (init_name, deinit_name) = match mode {
            Mode::Native => ("init", "deinit"),
            Mode::Headless => ("init_headless", "deinit_headless"),
        };

        let init = module.declare_external(init_name, vec![], void());
        let deinit = module.declare_external(deinit_name, vec![], void());
        let raise_error = module.declare_external("raise_error", vec![], void());

        let graphics = match mode {
            Mode::Native => Some(Graphics {
                draw_pixel: module.declare_external(
                    "draw_pixel",
                    vec![Type::I8, Type::I8],
                    void(),
                ),
                clear_pixel: module.declare_external(
                    "clear_pixel",
                    vec![Type::I8, Type::I8],
                    void(),
                ),
                get_pixel: module.declare_external(
                    "get_pixel",
                    vec![Type::I8, Type::I8],
                    Type::I8,
                ),
                update_screen: module.declare_external("update_screen", vec![], void()),
                clear_screen: module.declare_external("clear_screen", vec![], void()),
            }),
            Mode::Headless => None,
        };

        let push_char = module.declare_external("push_char", vec![Type::I8], void());
        let flush_char_buffer = module.declare_external("flush_char_buffer", vec![], void());
        let clear_char_buffer = module.declare_external("clear_char_buffer", vec![], void());
        let set_num = module.declare_external("set_num", vec![Type::I8], void());
        let set_signedness = module.declare_external("set_signedness", vec![Type::I1], void());
        let write_num = module.declare_external("write_num", vec![], void());

        let get_controller = match mode {
            Mode::Native => Some(module.declare_external("get_controller", vec![], Type::I8)),
            Mode::Headless => None,
        };
        let get_random_num = module.declare_external("get_random_num", vec![], Type::I8);

        Self {
            mode,
            init,
            deinit,
            raise_error,
            graphics,
            push_char,
            flush_char_buffer,
            clear_char_buffer,
            set_num,
            set_signedness,
            write_num,
            get_controller,
            get_random_num,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn init(&self) -> &ExternDecl {
        &self.init
    }

    pub fn deinit(&self) -> &ExternDecl {
        &self.deinit
    }

    pub fn raise_error(&self) -> &ExternDecl {
        &self.raise_error
    }

    /// Graphics externals, present only in native mode
    pub fn graphics(&self) -> Option<&Graphics> {
        self.graphics.as_ref()
    }

    pub fn push_char(&self) -> &ExternDecl {
        &self.push_char
    }

    pub fn flush_char_buffer(&self) -> &ExternDecl {
        &self.flush_char_buffer
    }

    pub fn clear_char_buffer(&self) -> &ExternDecl {
        &self.clear_char_buffer
    }

    pub fn set_num(&self) -> &ExternDecl {
        &self.set_num
    }

    pub fn set_signedness(&self) -> &ExternDecl {
        &self.set_signedness
    }

    /// Numeric display commit; declared for runtime completeness
    pub fn write_num(&self) -> &ExternDecl {
        &self.write_num
    }

    /// Controller input, present only in native mode
    pub fn get_controller(&self) -> Option<&ExternDecl> {
        self.get_controller.as_ref()
    }

    pub fn get_random_num(&self) -> &ExternDecl {
        &self.get_random_num
    }
}
