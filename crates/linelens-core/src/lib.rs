pub mod ast;
pub mod callspec;
pub mod error;
pub mod function;
pub mod literal;
pub mod parser;
pub mod script;
pub mod token;

// Re-export commonly used types
pub use ast::{BinOp, Block, Expr, IfBranch, Stmt, UnaryOp};
pub use callspec::{parse_call, CallSpec, CallSpecError};
pub use error::ParseError;
pub use function::{FunctionDef, Parameter};
pub use literal::Literal;
pub use parser::parse;
pub use script::Script;
