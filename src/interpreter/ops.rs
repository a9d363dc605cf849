use crate::ast::{Operator, UnaryOperator};
use crate::value::{Result, RuntimeError, Value};

pub fn unary(operator: UnaryOperator, operand: Value) -> Result<Value> {
    match (operator, operand) {
        (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (operator, operand) => Err(RuntimeError::UnsupportedUnaryOperator {
            operator,
            operand: operand.type_name(),
        }),
    }
}

pub fn binary(operator: Operator, left: Value, right: Value) -> Result<Value> {
    match (&left, &right) {
        (Value::Int(l), Value::Int(r)) => integer(operator, *l, *r),
        (Value::Int(_), Value::Real(_))
        | (Value::Real(_), Value::Int(_))
        | (Value::Real(_), Value::Real(_)) => real(operator, as_real(&left), as_real(&right)),
        (Value::String(l), Value::String(r)) => {
            equality(operator, l == r).ok_or_else(|| unsupported(operator, &left, &right))
        }
        (Value::Bool(l), Value::Bool(r)) => {
            equality(operator, l == r).ok_or_else(|| unsupported(operator, &left, &right))
        }
        _ => Err(unsupported(operator, &left, &right)),
    }
}

fn unsupported(operator: Operator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperator {
        operator,
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn as_real(value: &Value) -> f64 {
    match value {
        Value::Int(n) => *n as f64,
        Value::Real(x) => *x,
        _ => f64::NAN,
    }
}

fn equality(operator: Operator, equal: bool) -> Option<Value> {
    match operator {
        Operator::Equal => Some(Value::Bool(equal)),
        Operator::NotEqual => Some(Value::Bool(!equal)),
        _ => None,
    }
}

fn integer(operator: Operator, l: i64, r: i64) -> Result<Value> {
    let checked = |result: Option<i64>| {
        result
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { operator })
    };

    match operator {
        Operator::Plus => checked(l.checked_add(r)),
        Operator::Minus => checked(l.checked_sub(r)),
        Operator::Star => checked(l.checked_mul(r)),
        Operator::Slash if r == 0 => Err(RuntimeError::DivisionByZero),
        Operator::Slash => checked(l.checked_div(r)),
        Operator::Less => Ok(Value::Bool(l < r)),
        Operator::LessEqual => Ok(Value::Bool(l <= r)),
        Operator::Greater => Ok(Value::Bool(l > r)),
        Operator::GreaterEqual => Ok(Value::Bool(l >= r)),
        Operator::Equal => Ok(Value::Bool(l == r)),
        Operator::NotEqual => Ok(Value::Bool(l != r)),
    }
}

fn real(operator: Operator, l: f64, r: f64) -> Result<Value> {
    match operator {
        Operator::Plus => Ok(Value::Real(l + r)),
        Operator::Minus => Ok(Value::Real(l - r)),
        Operator::Star => Ok(Value::Real(l * r)),
        Operator::Slash if r == 0.0 => Err(RuntimeError::DivisionByZero),
        Operator::Slash => Ok(Value::Real(l / r)),
        Operator::Less => Ok(Value::Bool(l < r)),
        Operator::LessEqual => Ok(Value::Bool(l <= r)),
        Operator::Greater => Ok(Value::Bool(l > r)),
        Operator::GreaterEqual => Ok(Value::Bool(l >= r)),
        Operator::Equal => Ok(Value::Bool(l == r)),
        Operator::NotEqual => Ok(Value::Bool(l != r)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_integer_overflow_is_reported() {
        assert_eq!(
            binary(Operator::Plus, Value::Int(i64::MAX), Value::Int(1)),
            Err(RuntimeError::IntegerOverflow {
                operator: Operator::Plus
            })
        );
        assert_eq!(
            binary(Operator::Slash, Value::Int(i64::MIN), Value::Int(-1)),
            Err(RuntimeError::IntegerOverflow {
                operator: Operator::Slash
            })
        );
        assert_eq!(
            binary(Operator::Minus, Value::Int(i64::MIN), Value::Int(1)),
            Err(RuntimeError::IntegerOverflow {
                operator: Operator::Minus
            })
        );
    }

    #[test]
    fn test_mixed_numeric_promotes() {
        assert_eq!(
            binary(Operator::Star, Value::Int(3), Value::Real(0.5)),
            Ok(Value::Real(1.5))
        );
        assert_eq!(
            binary(Operator::Equal, Value::Real(2.0), Value::Int(2)),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_arrays_have_no_operators() {
        let array = Value::Array(vec![Value::Int(1)]);
        assert_eq!(
            binary(Operator::Equal, array.clone(), array),
            Err(RuntimeError::UnsupportedOperator {
                operator: Operator::Equal,
                left: "[int]".to_owned(),
                right: "[int]".to_owned(),
            })
        );
    }

    #[test]
    fn test_not_requires_bool() {
        assert_eq!(
            unary(UnaryOperator::Not, Value::Bool(false)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            unary(UnaryOperator::Not, Value::Int(0)),
            Err(RuntimeError::UnsupportedUnaryOperator {
                operator: UnaryOperator::Not,
                operand: "int".to_owned(),
            })
        );
    }
}
