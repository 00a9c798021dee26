//! Operator and cast semantics over [`Value`]
//!
//! Everything here is pure. `read` is the one operator with a side effect and
//! lives in the evaluator.

use crate::error::{Error, Result};
use crate::parser::{BinaryOp, CastType, UnaryOp};
use crate::runtime::Value;

/// Applies a binary operator to two evaluated operands
///
/// Compound assignment goes through here too, so `s += "x"` and
/// `s = s + "x"` behave identically.
pub fn binary(op: BinaryOp, left: &Value, right: &Value, line: usize) -> Result<Value> {
    use BinaryOp::*;

    match op {
        Equal => Ok(Value::flag(left == right)),
        NotEqual => Ok(Value::flag(left != right)),
        Add => add(left, right, line),
        And | Or | LowerThan | LowerEqual | GreaterThan | GreaterEqual | Contains
        | NotContains | Sub | Mul | Div | Mod | Power => {
            let (a, b) = numbers(op, left, right, line)?;
            integer(op, a, b, line)
        }
    }
}

/// Both operands as Numbers, or a type error naming the operator
fn numbers(op: BinaryOp, left: &Value, right: &Value, line: usize) -> Result<(i32, i32)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(Error::type_error(
            line,
            format!(
                "{} {} {}",
                left.type_name(),
                op,
                right.type_name()
            ),
        )),
    }
}

/// `+` concatenates as soon as either side is Text
fn add(left: &Value, right: &Value, line: usize) -> Result<Value> {
    match (left, right) {
        (Value::Text(_), _) | (_, Value::Text(_)) => Ok(Value::Text(format!("{}{}", left, right))),
        _ => {
            let (a, b) = numbers(BinaryOp::Add, left, right, line)?;
            Ok(Value::Number(a.wrapping_add(b)))
        }
    }
}

fn integer(op: BinaryOp, a: i32, b: i32, line: usize) -> Result<Value> {
    use BinaryOp::*;

    let value = match op {
        And => Value::flag(a != 0 && b != 0),
        Or => Value::flag(a != 0 || b != 0),
        LowerThan => Value::flag(a < b),
        LowerEqual => Value::flag(a <= b),
        GreaterThan => Value::flag(a > b),
        GreaterEqual => Value::flag(a >= b),
        // Membership only compares Numbers
        Contains => Value::flag(a == b),
        NotContains => Value::flag(a != b),
        Add => Value::Number(a.wrapping_add(b)),
        Sub => Value::Number(a.wrapping_sub(b)),
        Mul => Value::Number(a.wrapping_mul(b)),
        Div if b == 0 => return Err(Error::DivisionByZero { line }),
        Div => Value::Number(a.wrapping_div(b)),
        Mod if b == 0 => return Err(Error::DivisionByZero { line }),
        Mod => Value::Number(a.wrapping_rem(b)),
        // Float cast saturates at the i32 bounds and maps NaN to zero
        Power => Value::Number(f64::from(a).powf(f64::from(b)) as i32),
        Equal | NotEqual => Value::flag((a == b) == (op == Equal)),
    };
    Ok(value)
}

/// Applies one of the side-effect free unary operators
///
/// [`UnaryOp::Read`] needs a console and is rejected here.
pub fn unary(op: UnaryOp, operand: &Value, line: usize) -> Result<Value> {
    let mismatch = || Error::type_error(line, format!("{}({})", op, operand.type_name()));

    match op {
        UnaryOp::Not => Ok(Value::Boolean(!operand.is_truthy())),
        UnaryOp::Neg => match operand {
            Value::Number(n) => Ok(Value::Number(n.wrapping_neg())),
            _ => Err(mismatch()),
        },
        UnaryOp::Empty => match operand {
            Value::Array(_) | Value::Map(_) | Value::Text(_) => {
                Ok(Value::Boolean(operand.len() == Some(0)))
            }
            _ => Err(mismatch()),
        },
        UnaryOp::Size => operand
            .len()
            .map(|n| Value::Number(i32::try_from(n).unwrap_or(i32::MAX)))
            .ok_or_else(mismatch),
        UnaryOp::Keys => match operand {
            Value::Map(entries) => Ok(Value::array(
                entries.keys().map(|k| Value::text(k.as_str())).collect(),
            )),
            _ => Err(mismatch()),
        },
        UnaryOp::Values => match operand {
            Value::Map(entries) => Ok(Value::array(entries.values().cloned().collect())),
            _ => Err(mismatch()),
        },
        UnaryOp::Read => Err(mismatch()),
    }
}

/// `expr as Type`; total over every value
pub fn cast(target: CastType, operand: &Value) -> Value {
    match target {
        CastType::Boolean => Value::Boolean(operand.is_truthy()),
        CastType::Integer => Value::Number(operand.to_integer()),
        CastType::String => Value::Text(operand.to_string()),
    }
}

/// Largest number of Null slots a single write may add past an array's end
pub const MAX_ARRAY_PADDING: usize = 65_536;

/// Builds a copy of `container` with `index` set to `value`
///
/// Arrays grow with Null padding when written past the end, by at most
/// [`MAX_ARRAY_PADDING`] slots.
pub fn replace(container: &Value, index: &Value, value: Value, line: usize) -> Result<Value> {
    match (container, index) {
        (Value::Array(items), Value::Number(i)) => {
            let i = usize::try_from(*i)
                .map_err(|_| Error::type_error(line, format!("negative array index {}", i)))?;
            if i > items.len().saturating_add(MAX_ARRAY_PADDING) {
                return Err(Error::type_error(
                    line,
                    format!("array index {} is too far past the end ({} items)", i, items.len()),
                ));
            }
            let mut items = items.as_ref().clone();
            if i >= items.len() {
                items.resize(i + 1, Value::Null);
            }
            items[i] = value;
            Ok(Value::array(items))
        }
        (Value::Map(entries), Value::Text(key)) => {
            let mut entries = entries.as_ref().clone();
            entries.insert(key.clone(), value);
            Ok(Value::map(entries))
        }
        _ => Err(Error::type_error(
            line,
            format!(
                "cannot assign into {} with {} index",
                container.type_name(),
                index.type_name()
            ),
        )),
    }
}
