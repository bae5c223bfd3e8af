//! Tobsterlang Compiler
//!
//! Tobsterlang is a minimal imperative language whose programs are written
//! as XML documents. The compiler turns one document into one relocatable
//! object file.
//!
//! # Architecture
//!
//! ```text
//! Source Code (.xml)
//!       │
//!       ▼
//! ┌─────────────┐
//! │   Parser    │  → attributed tree (`ast::Program`)
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │  Lowering   │  → LLVM module (`codegen::Codegen`)
//! └─────────────┘
//!       │
//!       ▼
//! ┌─────────────┐
//! │  Backend    │  → optimized module → object file
//! └─────────────┘
//! ```

pub mod ast;
pub mod backend;
pub mod codegen;
pub mod error;
pub mod escape;
pub mod optimizer;
pub mod parser;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
