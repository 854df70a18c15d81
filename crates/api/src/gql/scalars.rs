use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use std::fmt;

/// Whole Malaysian ringgit (e.g., 110 == RM 110).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Money(pub i32);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RM {}", self.0)
    }
}

#[Scalar]
impl ScalarType for Money {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .filter(|i| *i >= 0)
                .map(Money)
                .ok_or_else(|| InputValueError::custom("Money expects a non-negative whole amount")),
            _ => Err(InputValueError::custom("Money must be a number (whole ringgit)")),
        }
    }

    fn to_value(&self) -> Value {
        Value::Number(self.0.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_scalar() {
        assert_eq!(Money(110).to_string(), "RM 110");
        assert_eq!(Money::parse(Value::Number(120.into())).unwrap(), Money(120));
        assert!(Money::parse(Value::Number((-5).into())).is_err());
        assert!(Money::parse(Value::String("110".into())).is_err());
    }
}
