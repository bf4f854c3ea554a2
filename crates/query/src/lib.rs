pub mod error;
pub mod eval;
pub mod expr;
pub mod parser;

pub use error::ConditionError;
pub use eval::{evaluate, matches};
pub use expr::{Comparison, Condition, Literal, Operand, RelOp};
pub use parser::parse_condition;
