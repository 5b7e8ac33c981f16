//! Formatting of the front end's values.
//!
//! - [`source`]: the canonical, re-parseable rendering of the AST, exposed
//!   through [`std::fmt::Display`].
//! - [`tree`]: an indented debug tree of the AST, with or without positions.
//! - [`error`]: the positioned error messages.

pub mod error;
pub mod source;
pub mod tree;
