pub mod libs;

pub use intspan::{reader, writer};
