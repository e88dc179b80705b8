pub mod size;

pub use size::{parse_size, parse_target_size};
