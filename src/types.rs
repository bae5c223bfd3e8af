//! Target Types
//!
//! The fixed set of machine types a program can name. All types are
//! explicit strings in the tree; nothing is inferred.

use std::fmt;

use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;
use inkwell::AddressSpace;

use crate::error::{Error, Result};

/// A Tobsterlang machine type.
///
/// `String` is represented identically to a byte pointer; there is no
/// distinct array or length-carrying type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Void,
    Int8,
    Int16,
    Int32,
    Int64,
    String,
}

impl Type {
    /// Resolves a declared type name. Unknown names are fatal.
    pub fn resolve(name: &str) -> Result<Type> {
        match name {
            "Void" => Ok(Type::Void),
            "Int8" => Ok(Type::Int8),
            "Int16" => Ok(Type::Int16),
            "Int32" => Ok(Type::Int32),
            "Int64" => Ok(Type::Int64),
            "String" => Ok(Type::String),
            _ => Err(Error::UnknownType(name.to_string())),
        }
    }

    /// The LLVM rendering, or `None` for `Void`.
    pub fn llvm_type<'ctx>(&self, context: &'ctx Context) -> Option<BasicTypeEnum<'ctx>> {
        match self {
            Type::Void => None,
            Type::Int8 => Some(context.i8_type().into()),
            Type::Int16 => Some(context.i16_type().into()),
            Type::Int32 => Some(context.i32_type().into()),
            Type::Int64 => Some(context.i64_type().into()),
            Type::String => Some(context.i8_type().ptr_type(AddressSpace::default()).into()),
        }
    }

    /// Bit width of integer types; `None` otherwise.
    pub fn bit_width(&self) -> Option<u32> {
        match self {
            Type::Int8 => Some(8),
            Type::Int16 => Some(16),
            Type::Int32 => Some(32),
            Type::Int64 => Some(64),
            Type::Void | Type::String => None,
        }
    }

    /// Is this one of the fixed-width integer types?
    pub fn is_integer(&self) -> bool {
        self.bit_width().is_some()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Void => "Void",
            Type::Int8 => "Int8",
            Type::Int16 => "Int16",
            Type::Int32 => "Int32",
            Type::Int64 => "Int64",
            Type::String => "String",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_the_fixed_set() {
        for name in ["Void", "Int8", "Int16", "Int32", "Int64", "String"] {
            let ty = Type::resolve(name).unwrap();
            assert_eq!(ty.to_string(), name);
        }
    }

    #[test]
    fn unknown_name_is_fatal() {
        let err = Type::resolve("Float").unwrap_err();
        assert!(matches!(err, Error::UnknownType(name) if name == "Float"));
    }

    #[test]
    fn integer_widths() {
        assert_eq!(Type::Int8.bit_width(), Some(8));
        assert_eq!(Type::Int64.bit_width(), Some(64));
        assert_eq!(Type::Void.bit_width(), None);
        assert_eq!(Type::String.bit_width(), None);
        assert!(Type::Int32.is_integer());
        assert!(!Type::String.is_integer());
    }

    #[test]
    fn void_has_no_llvm_rendering() {
        let context = Context::create();
        assert!(Type::Void.llvm_type(&context).is_none());
        assert!(Type::Int32.llvm_type(&context).unwrap().is_int_type());
        assert!(Type::String.llvm_type(&context).unwrap().is_pointer_type());
    }
}
