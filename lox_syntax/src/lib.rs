mod ast;
mod printer;
mod syntax_node;
mod token;

pub use ast::*;
pub use printer::print_program;
pub use syntax_node::*;
pub use token::*;
