//! Backend Emitter
//!
//! Consumes a finished module and writes one relocatable object file for
//! the host machine. Target selection, the data layout, optimization, and
//! file emission all live here; the lowering engine never sees any of it.

use std::path::Path;

use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine,
};

use crate::error::{Error, Result};
use crate::optimizer::{self, OptLevel};

/// Compiles `module` to an object file at `path`.
pub fn emit_object(module: &Module, path: &Path, level: OptLevel) -> Result<()> {
    Target::initialize_native(&InitializationConfig::default()).map_err(Error::Backend)?;

    let triple = TargetMachine::get_default_triple();
    let target = Target::from_triple(&triple).map_err(|e| Error::Backend(e.to_string()))?;

    let cpu = TargetMachine::get_host_cpu_name().to_string();
    let features = TargetMachine::get_host_cpu_features().to_string();

    let machine = target
        .create_target_machine(
            &triple,
            &cpu,
            &features,
            level.codegen_level(),
            RelocMode::Default,
            CodeModel::Default,
        )
        .ok_or_else(|| Error::Backend("could not create target machine".to_string()))?;

    module.set_triple(&triple);
    module.set_data_layout(&machine.get_target_data().get_data_layout());

    // A broken module still gets emitted, like it always has; the
    // verifier complaint goes to the log so the IR can be inspected.
    if let Err(message) = module.verify() {
        log::warn!("module verification failed: {}", message.to_string());
    }

    optimizer::optimize(module, &machine, level)?;

    machine
        .write_to_file(module, FileType::Object, path)
        .map_err(|e| Error::Backend(e.to_string()))
}
