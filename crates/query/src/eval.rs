use std::cmp::Ordering;

use storage::{Schema, Tuple, Value};

use crate::error::ConditionError;
use crate::expr::{Comparison, Condition, Literal, Operand, RelOp};

/// Evaluates a condition against a tuple under the given schema.
///
/// A comparison between values that cannot be meaningfully ordered (a NULL
/// cell on either side, or mismatched domains) evaluates to `false` rather
/// than failing the whole condition — only an unresolvable identifier or a
/// malformed condition is an error.
pub fn evaluate(condition: &Condition, tuple: &Tuple, schema: &Schema) -> Result<bool, ConditionError> {
    match condition {
        Condition::Comparison(cmp) => evaluate_comparison(cmp, tuple, schema),
        Condition::And(left, right) => {
            Ok(evaluate(left, tuple, schema)? && evaluate(right, tuple, schema)?)
        }
        Condition::Or(left, right) => {
            Ok(evaluate(left, tuple, schema)? || evaluate(right, tuple, schema)?)
        }
    }
}

/// The executor-facing "does this tuple match" wrapper (spec §4.1's
/// `Table.matchesCondition`): an evaluation error (unknown attribute,
/// malformed condition) counts as no match rather than aborting the scan.
/// Lives here rather than on `storage::Table` because matching requires the
/// condition evaluator, and `storage` does not depend on `query`.
pub fn matches(condition: &Condition, tuple: &Tuple, schema: &Schema) -> bool {
    evaluate(condition, tuple, schema).unwrap_or(false)
}

fn evaluate_comparison(
    comparison: &Comparison,
    tuple: &Tuple,
    schema: &Schema,
) -> Result<bool, ConditionError> {
    let left = resolve_operand(&comparison.left, tuple, schema)?;
    let right = resolve_operand(&comparison.right, tuple, schema)?;
    Ok(compare_values(&left, &right, comparison.op))
}

fn resolve_operand(operand: &Operand, tuple: &Tuple, schema: &Schema) -> Result<Value, ConditionError> {
    match operand {
        Operand::Identifier(name) => {
            let index = schema
                .attribute_index(name)
                .ok_or_else(|| ConditionError::UnknownAttribute(name.clone()))?;
            Ok(tuple.get(index).cloned().unwrap_or(Value::Null))
        }
        Operand::Literal(Literal::Integer(n)) => Ok(Value::Integer(*n)),
        Operand::Literal(Literal::Float(n)) => Ok(Value::Float(*n)),
        Operand::Literal(Literal::Text(text)) => Ok(Value::Text(text.clone())),
    }
}

fn compare_values(left: &Value, right: &Value, op: RelOp) -> bool {
    if left.is_null() || right.is_null() {
        return false;
    }
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
        (Value::Integer(a), Value::Float(b)) => Some((*a as f64).total_cmp(b)),
        (Value::Float(a), Value::Integer(b)) => Some(a.total_cmp(&(*b as f64))),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        RelOp::Eq => ordering == Ordering::Equal,
        RelOp::Ne => ordering != Ordering::Equal,
        RelOp::Lt => ordering == Ordering::Less,
        RelOp::Le => ordering != Ordering::Greater,
        RelOp::Gt => ordering == Ordering::Greater,
        RelOp::Ge => ordering != Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_condition;
    use storage::{Attribute, Domain};

    fn schema() -> Schema {
        Schema::new(vec![
            Attribute::new("id", Domain::Integer, true),
            Attribute::new("score", Domain::Float, false),
            Attribute::new("name", Domain::Text, false),
        ])
        .unwrap()
    }

    fn row(id: i32, score: f64, name: &str) -> Tuple {
        Tuple::new(vec![Value::Integer(id), Value::Float(score), Value::Text(name.into())])
    }

    #[test]
    fn and_or_combine_as_expected() {
        let schema = schema();
        let tuple = row(1, 9.5, "ann");
        let cond = parse_condition("id = 1 AND (score > 9 OR name = 'bob')").unwrap();
        assert!(evaluate(&cond, &tuple, &schema).unwrap());
    }

    #[test]
    fn comparison_against_null_is_false() {
        let schema = schema();
        let tuple = Tuple::new(vec![Value::Integer(1), Value::Null, Value::Text("x".into())]);
        let cond = parse_condition("score > 1").unwrap();
        assert!(!evaluate(&cond, &tuple, &schema).unwrap());
    }

    #[test]
    fn unknown_attribute_is_an_error() {
        let schema = schema();
        let tuple = row(1, 1.0, "x");
        let cond = parse_condition("nope = 1").unwrap();
        assert!(evaluate(&cond, &tuple, &schema).is_err());
    }

    #[test]
    fn cross_domain_comparison_is_false_not_error() {
        let schema = schema();
        let tuple = row(1, 1.0, "x");
        let cond = parse_condition("id = 'one'").unwrap();
        assert!(!evaluate(&cond, &tuple, &schema).unwrap());
    }
}
