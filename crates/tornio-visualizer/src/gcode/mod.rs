//! G-Code instruction model, parser and program validator
//!
//! This module provides:
//! - Typed instructions for the accepted opcode set
//! - Single-line parsing with line-numbered diagnostics
//! - Whole-program validation (fail-fast)

pub mod instruction;
pub mod parser;
pub mod validator;

pub use instruction::*;
pub use parser::*;
pub use validator::*;
