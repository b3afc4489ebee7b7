//! Compiles a regular expression into standalone Rust matcher routines.
//!
//! # Example
//!
//! ```rust
//! // A pattern is parsed into a syntax tree, then lowered into an ordered set
//! // of routines, one per tree node, plus a public entry routine.
//! use regcc::{compile, parse};
//!
//! // The routines can be evaluated in place, without compiling the source
//! // they render to.
//! use regcc_routines::run;
//!
//! let routines = parse(b"a|ab").map(|regex| compile(&regex)).expect("valid pattern");
//!
//! // Alternation takes the longest matching branch rather than the first.
//! assert_eq!(Some(2), run(&routines, b"abc"));
//! assert_eq!(None, run(&routines, b"bc"));
//!
//! // Rendering produces the Rust source, with the entry routine last.
//! let source = routines.with_entry_name("is_a_or_ab").to_string();
//! assert!(source.ends_with(
//!     "pub fn is_a_or_ab(input: &[u8]) -> Option<usize> {\n    regex_000(input)\n}\n"
//! ));
//! ```

pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;

pub use compiler::compile;
pub use lexer::{LexErr, LexErrKind};
pub use parser::{parse, ParseErr, ParseErrKind};

use regcc_routines::Routines;

/// Parses and lowers `pattern` in a single step.
pub fn compile_pattern(pattern: &[u8]) -> Result<Routines, ParseErr> {
    parse(pattern).map(|regex| compile(&regex))
}

/// Compiles `pattern` and renders its routines as Rust source, naming the
/// public entry routine `entry`.
///
/// # Example
///
/// ```rust
/// let source = regcc::compile_to_source(b"[0-9]+", "is_number").expect("valid pattern");
///
/// assert!(source.starts_with("// [0-9]\nfn atom_000(input: &[u8]) -> Option<usize> {"));
/// assert!(source.contains("pub fn is_number(input: &[u8]) -> Option<usize> {"));
/// ```
pub fn compile_to_source(pattern: &[u8], entry: &str) -> Result<String, ParseErr> {
    compile_pattern(pattern).map(|routines| routines.with_entry_name(entry).to_string())
}
