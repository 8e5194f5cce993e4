//! The filter-expression engine: tokenizer, predicate compiler and
//! the card filter pipeline.

pub mod compile;
pub mod pipeline;
pub mod predicate;
pub mod token;

pub use compile::{AtomBuilder, CompileIssue};
pub use pipeline::{apply_filters, FilterField, FilterIssue, FilterOutcome};
pub use predicate::{Cmp, Match, Predicate, StatField, TextField};
pub use token::{parse, AtomValue, BinaryOp, SyntaxError, TokenTree, UnaryOp};
