use crate::parser::{BinaryOperator, BuiltinType, UnaryOperator};

/// A runtime value. `None` is what a `var` declaration holds before its first
/// assignment, and what a call to a procedure without a return type yields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    None,
}

/// Why an operation could not produce a value. The interpreter attaches the
/// source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    DivisionByZero,
    Overflow,
    Missing,
}

impl Value {
    /// Zero value bound by a declaration of type `ty`.
    pub fn zero(ty: BuiltinType) -> Self {
        match ty {
            BuiltinType::Integer => Value::Int(0),
            BuiltinType::Float => Value::Float(0.0),
            BuiltinType::Universal => Value::None,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Value::Int(n) => n != 0,
            Value::Float(f) => f != 0.0,
            Value::None => false,
        }
    }

    fn as_f64(self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(n as f64),
            Value::Float(f) => Some(f),
            Value::None => None,
        }
    }

    pub fn unary(op: UnaryOperator, operand: Value) -> Result<Value, ValueError> {
        match (op, operand) {
            (_, Value::None) => Err(ValueError::Missing),
            (UnaryOperator::Plus, v) => Ok(v),
            (UnaryOperator::Minus, Value::Int(n)) => {
                n.checked_neg().map(Value::Int).ok_or(ValueError::Overflow)
            }
            (UnaryOperator::Minus, Value::Float(f)) => Ok(Value::Float(-f)),
        }
    }

    /// `/` always divides as floats.
    pub fn binary(op: BinaryOperator, lhs: Value, rhs: Value) -> Result<Value, ValueError> {
        match op {
            BinaryOperator::Add => arith(lhs, rhs, i64::checked_add, |a, b| a + b),
            BinaryOperator::Sub => arith(lhs, rhs, i64::checked_sub, |a, b| a - b),
            BinaryOperator::Mul => arith(lhs, rhs, i64::checked_mul, |a, b| a * b),
            BinaryOperator::Div => {
                let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) else {
                    return Err(ValueError::Missing);
                };
                if b == 0.0 {
                    return Err(ValueError::DivisionByZero);
                }
                Ok(Value::Float(a / b))
            }
        }
    }
}

/// Integer arithmetic while both sides are integers, float otherwise.
fn arith(
    lhs: Value,
    rhs: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, ValueError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(a, b).map(Value::Int).ok_or(ValueError::Overflow),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(ValueError::Missing),
        },
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values() {
        assert_eq!(Value::zero(BuiltinType::Integer), Value::Int(0));
        assert_eq!(Value::zero(BuiltinType::Float), Value::Float(0.0));
        assert_eq!(Value::zero(BuiltinType::Universal), Value::None);
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Int(-3).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(!Value::None.is_truthy());
    }

    #[test]
    fn division_is_always_float() {
        assert_eq!(
            Value::binary(BinaryOperator::Div, Value::Int(7), Value::Int(2)),
            Ok(Value::Float(3.5))
        );
        assert_eq!(
            Value::binary(BinaryOperator::Div, Value::Int(6), Value::Int(3)),
            Ok(Value::Float(2.0))
        );
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            Value::binary(BinaryOperator::Div, Value::Int(1), Value::Float(0.0)),
            Err(ValueError::DivisionByZero)
        );
    }

    #[test]
    fn mixed_arithmetic_promotes() {
        assert_eq!(
            Value::binary(BinaryOperator::Add, Value::Int(1), Value::Float(0.5)),
            Ok(Value::Float(1.5))
        );
        assert_eq!(
            Value::binary(BinaryOperator::Mul, Value::Int(4), Value::Int(5)),
            Ok(Value::Int(20))
        );
    }

    #[test]
    fn overflow_and_missing() {
        assert_eq!(
            Value::binary(BinaryOperator::Add, Value::Int(i64::MAX), Value::Int(1)),
            Err(ValueError::Overflow)
        );
        assert_eq!(
            Value::unary(UnaryOperator::Minus, Value::Int(i64::MIN)),
            Err(ValueError::Overflow)
        );
        assert_eq!(
            Value::binary(BinaryOperator::Sub, Value::None, Value::Int(1)),
            Err(ValueError::Missing)
        );
        assert_eq!(
            Value::unary(UnaryOperator::Plus, Value::None),
            Err(ValueError::Missing)
        );
    }

    #[test]
    fn subtraction_and_division_operands() {
        assert_eq!(
            Value::binary(BinaryOperator::Sub, Value::Float(2.5), Value::Int(1)),
            Ok(Value::Float(1.5))
        );
        assert_eq!(
            Value::binary(BinaryOperator::Sub, Value::Int(i64::MIN), Value::Int(1)),
            Err(ValueError::Overflow)
        );
        assert_eq!(
            Value::binary(BinaryOperator::Div, Value::None, Value::Int(2)),
            Err(ValueError::Missing)
        );
        assert_eq!(
            Value::binary(BinaryOperator::Mul, Value::Float(1.0), Value::None),
            Err(ValueError::Missing)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(6).to_string(), "6");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::None.to_string(), "None");
    }
}
