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

use std::path::Path;

use clap::Parser;
use log::{error, info};

use batpu_recomp::core::error::Result;
use batpu_recomp::core::isa::decode_program;
use batpu_recomp::core::loader::load_mc_file;
use batpu_recomp::core::runtime::Mode;
use batpu_recomp::core::translate::{translate, Options};

/// BatPU-2 static recompiler
#[derive(Parser)]
#[command(name = "recomp")]
#[command(about = "Recompiles a BatPU-2 machine code file to SSA IR", long_about = None)]
struct Args {
    /// Path to the input machine code file
    in_file: String,

    /// Path to the output IR file
    out_file: String,

    /// Lower without a graphics surface or controller
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    // Initialize logger with default level INFO
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    info!("recomp v{}", env!("CARGO_PKG_VERSION"));
    info!("input: {}", args.in_file);

    let words = load_mc_file(&args.in_file)?;
    let program = match decode_program(&words) {
        Ok(program) => program,
        Err(e) => {
            error!("decode failed: {}", e);
            return Err(e);
        }
    };

    let mode = if args.headless {
        Mode::Headless
    } else {
        Mode::Native
    };
    let module_name = Path::new(&args.in_file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.in_file.clone());

    let module = match translate(&program, &Options::new(module_name, mode)) {
        Ok(module) => module,
        Err(e) => {
            error!("translation failed: {}", e);
            return Err(e);
        }
    };

    std::fs::write(&args.out_file, module.to_string())?;
    info!("wrote IR module to {}", args.out_file);

    Ok(())
}
