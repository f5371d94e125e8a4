mod error;
mod parser;
mod scanner;

pub use error::*;
pub use parser::*;
pub use scanner::*;
