pub mod parser;
pub mod runner;

pub use parser::{Script, Step};
pub use runner::Runner;
