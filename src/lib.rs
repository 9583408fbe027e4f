//! tapmath: a concept tree for learning math
//!
//! Concepts are grouped into three progression layers (roots, trunk, branches).
//! Completing enough concepts of one layer unlocks the next. Progress is kept in a
//! small JSON record between sessions.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
