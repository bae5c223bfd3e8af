//! Tree Lowering
//!
//! Walks the attributed tree and builds an LLVM module from it. Each node
//! kind has one lowering rule; composite nodes lower their children first
//! and consume the values the children produced. The engine owns a single
//! builder cursor, so exactly one function is ever under construction.

use std::collections::HashMap;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum};
use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, PointerValue};
use inkwell::AddressSpace;

use crate::ast::{Node, NodeKind, Program};
use crate::error::{Error, Result};
use crate::escape;
use crate::types::Type;

/// Reserved function name marking the program entry point.
pub const ENTRY_TOKEN: &str = "ZdraveitePriqteliAzSumTobstera";

/// Symbol the entry point must carry for the platform linker.
pub const ENTRY_SYMBOL: &str = "main";

/// LLVM's numeric id for the C calling convention.
const C_CALL_CONV: u32 = 0;

/// A stack slot: one variable's storage in the current function.
#[derive(Debug, Clone, Copy)]
struct Slot<'ctx> {
    ptr: PointerValue<'ctx>,
    ty: BasicTypeEnum<'ctx>,
}

/// Per-function variable bindings.
///
/// The table is flat and reset at every function boundary — there is no
/// scope stack, so re-declaring a name replaces its binding and nothing
/// is ever visible across functions.
#[derive(Debug, Default)]
struct SymbolTable<'ctx> {
    slots: HashMap<String, Slot<'ctx>>,
}

impl<'ctx> SymbolTable<'ctx> {
    fn reset(&mut self) {
        self.slots.clear();
    }

    fn bind(&mut self, name: &str, slot: Slot<'ctx>) {
        self.slots.insert(name.to_string(), slot);
    }

    fn lookup(&self, name: &str) -> Result<Slot<'ctx>> {
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedVariable(name.to_string()))
    }
}

/// Lowers a program tree into an LLVM module.
pub struct Codegen<'ctx> {
    context: &'ctx Context,
    builder: Builder<'ctx>,
    locals: SymbolTable<'ctx>,
}

impl<'ctx> Codegen<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self {
            context,
            builder: context.create_builder(),
            locals: SymbolTable::default(),
        }
    }

    /// Builds the module for `program`. On success the module is handed
    /// to the caller whole; the engine keeps no reference to it.
    pub fn generate(&mut self, program: &Program) -> Result<Module<'ctx>> {
        let module = self.context.create_module(&program.module);
        self.lower_nodes(&module, &program.items)?;
        Ok(module)
    }

    /// Lowers a node sequence in document order, collecting the values
    /// the nodes produce.
    fn lower_nodes(
        &mut self,
        module: &Module<'ctx>,
        nodes: &[Node],
    ) -> Result<Vec<BasicValueEnum<'ctx>>> {
        let mut values = Vec::new();
        for node in nodes {
            self.lower_node(module, node, &mut values)?;
        }
        Ok(values)
    }

    fn lower_node(
        &mut self,
        module: &Module<'ctx>,
        node: &Node,
        values: &mut Vec<BasicValueEnum<'ctx>>,
    ) -> Result<()> {
        match node.kind {
            NodeKind::Func => {
                let function = self.lower_func(module, node)?;
                values.push(function.as_global_value().as_pointer_value().into());
            }

            NodeKind::Var => {
                let name = node.require_attr("name")?;
                let ty = Type::resolve(node.require_attr("type")?)?;
                let llvm_ty = ty.llvm_type(self.context).ok_or_else(|| {
                    Error::malformed("Var", format!("variable `{}` cannot have type {}", name, ty))
                })?;
                let ptr = self.builder.build_alloca(llvm_ty, name)?;
                // Re-declaring a name replaces the binding; the old slot's
                // alloca stays in the function but becomes unreachable.
                self.locals.bind(name, Slot { ptr, ty: llvm_ty });
            }

            NodeKind::Value => {
                let type_name = node.require_attr("type")?;
                let ty = Type::resolve(type_name)?;
                let text = escape::unescape(node.text());
                if let Some(width) = ty.bit_width() {
                    let literal: i64 = text.parse().map_err(|_| {
                        Error::malformed(
                            "Value",
                            format!("`{}` is not a base-10 {} literal", text, ty),
                        )
                    })?;
                    let int_type = self.context.custom_width_int_type(width);
                    values.push(int_type.const_int(literal as u64, false).into());
                } else if ty == Type::String {
                    let global = self.builder.build_global_string_ptr(&text, "str")?;
                    values.push(global.as_pointer_value().into());
                } else {
                    return Err(Error::UnknownType(type_name.to_string()));
                }
            }

            NodeKind::Store => {
                let name = node.require_attr("name")?;
                if node.children.len() != 1 {
                    return Err(Error::malformed(
                        "Store",
                        format!("expected exactly 1 child, found {}", node.children.len()),
                    ));
                }
                let slot = self.locals.lookup(name)?;
                let operands = self.lower_nodes(module, &node.children)?;
                let value = operands
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::malformed("Store", "child produced no value"))?;
                self.builder.build_store(slot.ptr, value)?;
            }

            NodeKind::Load => {
                let name = node.require_attr("name")?;
                let slot = self.locals.lookup(name)?;
                values.push(self.builder.build_load(slot.ptr, name)?);
            }

            NodeKind::Ref => {
                let name = node.require_attr("name")?;
                let slot = self.locals.lookup(name)?;
                values.push(slot.ptr.into());
            }

            NodeKind::Add | NodeKind::Sub => {
                let operands = self.lower_nodes(module, &node.children)?;
                if operands.len() < 2 {
                    return Err(Error::malformed(
                        node.kind.to_string(),
                        format!("expected at least 2 operands, found {}", operands.len()),
                    ));
                }
                // Left fold: op(op(a, b), c). The fold order is the
                // documented contract, not an implementation accident.
                let mut acc = operands[0].into_int_value();
                for next in &operands[1..] {
                    acc = match node.kind {
                        NodeKind::Add => {
                            self.builder.build_int_add(acc, next.into_int_value(), "add")?
                        }
                        _ => self.builder.build_int_sub(acc, next.into_int_value(), "sub")?,
                    };
                }
                values.push(acc.into());
            }

            NodeKind::Return => {
                let operands = self.lower_nodes(module, &node.children)?;
                // One value returns it; zero or several degrade to a
                // void return.
                if operands.len() == 1 {
                    self.builder.build_return(Some(&operands[0]))?;
                } else {
                    self.builder.build_return(None)?;
                }
            }

            NodeKind::Call => {
                let name = node.require_attr("name")?;
                let callee = self.resolve_function(module, name)?;
                let operands = self.lower_nodes(module, &node.children)?;
                let args: Vec<BasicMetadataValueEnum<'ctx>> =
                    operands.iter().map(|value| (*value).into()).collect();
                let call = self.builder.build_call(callee, &args, "call")?;
                if let Some(value) = call.try_as_basic_value().left() {
                    values.push(value);
                }
            }
        }

        Ok(())
    }

    /// Lowers a `Func` node: signature from the attribute bag, one entry
    /// block, parameters spilled to stack slots, body in document order,
    /// then a synthesized terminator if the body did not end in `Return`.
    fn lower_func(&mut self, module: &Module<'ctx>, node: &Node) -> Result<FunctionValue<'ctx>> {
        let mut func_name: Option<&str> = None;
        let mut return_type = Type::Void;
        let mut param_names: Vec<&str> = Vec::new();
        let mut param_types: Vec<BasicTypeEnum<'ctx>> = Vec::new();

        // Every attribute that is not `name` or `returns` is a parameter,
        // in bag order. That order is the calling convention.
        for (attr, value) in &node.attrs {
            match attr.as_str() {
                "name" => func_name = Some(value.as_str()),
                "returns" => return_type = Type::resolve(value)?,
                _ => {
                    let ty = Type::resolve(value)?;
                    let llvm_ty = ty.llvm_type(self.context).ok_or_else(|| {
                        Error::malformed(
                            "Func",
                            format!("parameter `{}` cannot have type {}", attr, ty),
                        )
                    })?;
                    param_names.push(attr.as_str());
                    param_types.push(llvm_ty);
                }
            }
        }

        let declared_name =
            func_name.ok_or_else(|| Error::malformed("Func", "missing `name` attribute"))?;
        let name = if declared_name == ENTRY_TOKEN {
            ENTRY_SYMBOL
        } else {
            declared_name
        };

        let metadata_types: Vec<BasicMetadataTypeEnum<'ctx>> =
            param_types.iter().map(|ty| (*ty).into()).collect();
        let fn_type = match return_type.llvm_type(self.context) {
            Some(ty) => ty.fn_type(&metadata_types, false),
            None => self.context.void_type().fn_type(&metadata_types, false),
        };

        let function = module.add_function(name, fn_type, None);
        for (param, param_name) in function.get_param_iter().zip(param_names.iter().copied()) {
            param.set_name(param_name);
        }

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        self.locals.reset();

        // Parameters are spilled to stack slots and registered by name,
        // so `Store`/`Load` treat them like any other variable.
        for (param, param_name) in function.get_param_iter().zip(param_names.iter().copied()) {
            let ty = param.get_type();
            let ptr = self.builder.build_alloca(ty, param_name)?;
            self.builder.build_store(ptr, param)?;
            self.locals.bind(param_name, Slot { ptr, ty });
        }

        let produced = self.lower_nodes(module, &node.children)?;

        let ends_with_return = node
            .children
            .last()
            .map_or(false, |child| child.kind == NodeKind::Return);
        if !ends_with_return {
            self.emit_implicit_return(return_type, &produced)?;
        }

        log::debug!(
            "lowered function `{}` ({} parameters)",
            name,
            param_names.len()
        );
        Ok(function)
    }

    /// Synthesizes the terminator for a body that did not end in `Return`:
    /// a void return for void functions and empty bodies, otherwise a
    /// return of the last value the body produced.
    ///
    /// The value is not checked against the declared return type. The
    /// synthesis is kept in this one place so a checking pass can be
    /// inserted without touching the dispatch table.
    fn emit_implicit_return(
        &self,
        return_type: Type,
        produced: &[BasicValueEnum<'ctx>],
    ) -> Result<()> {
        match produced.last() {
            Some(value) if return_type != Type::Void => self.builder.build_return(Some(value))?,
            _ => self.builder.build_return(None)?,
        };
        Ok(())
    }

    /// Resolves a callee: functions already in the module win, then the
    /// runtime-library table, then failure. Library declarations land in
    /// the module on first use, so repeated calls hit the first branch.
    fn resolve_function(
        &self,
        module: &Module<'ctx>,
        name: &str,
    ) -> Result<FunctionValue<'ctx>> {
        if let Some(function) = module.get_function(name) {
            return Ok(function);
        }

        match name {
            "printf" | "scanf" => Ok(self.declare_io_builtin(module, name)),
            _ => Err(Error::UnknownFunction(name.to_string())),
        }
    }

    /// Declares a variadic formatted-I/O routine from the C runtime:
    /// `(ptr, ...) -> i32`, C calling convention.
    fn declare_io_builtin(&self, module: &Module<'ctx>, name: &str) -> FunctionValue<'ctx> {
        let format_ptr = self.context.i8_type().ptr_type(AddressSpace::default());
        let fn_type = self.context.i32_type().fn_type(&[format_ptr.into()], true);
        let function = module.add_function(name, fn_type, None);
        function.set_call_conventions(C_CALL_CONV);
        function
    }
}
