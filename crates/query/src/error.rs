use thiserror::Error;

/// Errors raised while parsing or evaluating a condition expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("unexpected end of condition, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("expected {expected}, found '{found}'")]
    Unexpected { expected: &'static str, found: String },

    #[error("unknown comparison operator '{0}'")]
    UnknownOperator(String),

    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("malformed numeric literal '{0}'")]
    BadNumber(String),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("trailing input after condition: '{0}'")]
    TrailingInput(String),
}
