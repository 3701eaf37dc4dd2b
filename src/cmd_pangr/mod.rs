//! Subcommand modules for the `pangr` binary.

pub mod bitarray;
pub mod cc;
pub mod cliques;
pub mod info;
pub mod module;
pub mod multigenics;
pub mod spot;
pub mod to_dot;
pub mod utils;
