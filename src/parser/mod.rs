//! Parsers for the notations embedded in free-text document fields.
//!
//! Every parser is a total function: any string yields a defined result, and
//! malformed input degrades to literal text instead of failing.

pub mod markdown;
pub mod outline;
pub mod shape;
