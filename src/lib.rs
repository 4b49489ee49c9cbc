//! Parser and structural model for Smali, the textual assembly format used
//! by `baksmali`/`smali` to represent Android DEX bytecode.
//!
//! The parser preserves comments, blank lines, and indentation well enough
//! to round-trip a file back to equivalent text; [`SmaliFile::validate`]
//! checks exactly how close a given round trip came.
//!
//! # Example
//!
//! ```rust
//! use smali::SmaliFile;
//!
//! let src = ".class public LFoo;\n.super Ljava/lang/Object;";
//! let file = SmaliFile::from_source(src).unwrap();
//! assert!(file.find_field("missing").is_none());
//! assert_eq!(file.to_source_string().unwrap(), src);
//! ```

pub mod attributes;
pub mod block;
pub mod error;
pub mod lex;
pub mod literal;
pub mod printer;
pub mod resolver;
mod smali_file;
pub mod statement;
pub mod token;
pub mod validate;

pub use block::{Block, Item};
pub use error::{Error, FormatError, ParseError, Result, ValidationError, Warning};
pub use smali_file::SmaliFile;
pub use statement::{Statement, Variant, VariantTag};
pub use validate::{
    file_validation, set_file_validation, set_statement_validation, statement_validation,
};
