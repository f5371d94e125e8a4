mod environment;
mod error;
mod interpreter;
mod value;

pub use environment::*;
pub use error::*;
pub use interpreter::*;
pub use value::*;
