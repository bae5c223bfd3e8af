//! Optimization Pipeline
//!
//! Runs LLVM's default per-module pipeline for the selected level over a
//! finished module. `O0` means "skip optimization entirely" — no pipeline
//! is even constructed.

use std::fmt;

use inkwell::module::Module;
use inkwell::passes::PassBuilderOptions;
use inkwell::targets::TargetMachine;
use inkwell::OptimizationLevel;

use crate::error::{Error, Result};

/// Optimization level selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptLevel {
    #[default]
    O0,
    O1,
    O2,
    O3,
    Os,
    Oz,
}

impl OptLevel {
    /// Parses the glued `-O` value (`-O2` arrives here as `"2"`).
    /// Unrecognized levels fall back to `O0`.
    pub fn from_flag(level: &str) -> OptLevel {
        match level {
            "1" => OptLevel::O1,
            "2" => OptLevel::O2,
            "3" => OptLevel::O3,
            "s" => OptLevel::Os,
            "z" => OptLevel::Oz,
            _ => OptLevel::O0,
        }
    }

    /// The instruction-selection level handed to the target machine.
    pub fn codegen_level(&self) -> OptimizationLevel {
        match self {
            OptLevel::O0 => OptimizationLevel::None,
            OptLevel::O1 => OptimizationLevel::Less,
            OptLevel::O2 | OptLevel::Os | OptLevel::Oz => OptimizationLevel::Default,
            OptLevel::O3 => OptimizationLevel::Aggressive,
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptLevel::O0 => "O0",
            OptLevel::O1 => "O1",
            OptLevel::O2 => "O2",
            OptLevel::O3 => "O3",
            OptLevel::Os => "Os",
            OptLevel::Oz => "Oz",
        };
        write!(f, "{}", name)
    }
}

/// Runs the default pipeline for `level` over `module`.
pub fn optimize(module: &Module, machine: &TargetMachine, level: OptLevel) -> Result<()> {
    if level == OptLevel::O0 {
        return Ok(());
    }

    let pipeline = format!("default<{}>", level);
    module
        .run_passes(&pipeline, machine, PassBuilderOptions::create())
        .map_err(|e| Error::Backend(e.to_string()))
}
