//! Typed view of a `POST /bfhl` body.
//!
//! A body carries at most one honoured key. Selection runs in a fixed
//! priority order (`fibonacci`, `prime`, `lcm`, `hcf`, `AI`) and the first
//! present key wins; any further keys are ignored.

use serde_json::{Number, Value};
use thiserror::Error;

pub const KEY_MISSING: &str = "Invalid request format. Key missing.";

/// Client-side problem with the request body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Which operation a body selects, with the raw value it carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation<'a> {
    Fibonacci(&'a Value),
    Prime(&'a Value),
    Lcm(&'a Value),
    Hcf(&'a Value),
    Ai(&'a Value),
}

impl<'a> Operation<'a> {
    /// Pick the operation by key presence in priority order.
    ///
    /// | key         | counts as present when                      |
    /// |-------------|---------------------------------------------|
    /// | `fibonacci` | the key exists, whatever its value          |
    /// | `prime`     | value is truthy                             |
    /// | `lcm`       | value is truthy                             |
    /// | `hcf`       | value is truthy                             |
    /// | `AI`        | value is truthy or the empty string         |
    pub fn select(body: &'a Value) -> Option<Self> {
        let fields = body.as_object()?;

        if let Some(value) = fields.get("fibonacci") {
            return Some(Operation::Fibonacci(value));
        }
        if let Some(value) = fields.get("prime").filter(|v| is_truthy(v)) {
            return Some(Operation::Prime(value));
        }
        if let Some(value) = fields.get("lcm").filter(|v| is_truthy(v)) {
            return Some(Operation::Lcm(value));
        }
        if let Some(value) = fields.get("hcf").filter(|v| is_truthy(v)) {
            return Some(Operation::Hcf(value));
        }
        // An empty question is still an AI request, just an invalid one.
        if let Some(value) = fields
            .get("AI")
            .filter(|v| is_truthy(v) || v.as_str() == Some(""))
        {
            return Some(Operation::Ai(value));
        }
        None
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Fibonacci(_) => "fibonacci",
            Operation::Prime(_) => "prime",
            Operation::Lcm(_) => "lcm",
            Operation::Hcf(_) => "hcf",
            Operation::Ai(_) => "AI",
        }
    }

    /// Check the value's shape and convert it into a typed request.
    pub fn validate(self) -> Result<BfhlRequest, ValidationError> {
        match self {
            Operation::Fibonacci(value) => parse_leading_integer(value)
                .map(BfhlRequest::Fibonacci)
                .ok_or_else(|| ValidationError::new("fibonacci must be a number")),
            Operation::Prime(value) => value
                .as_array()
                .map(|items| BfhlRequest::Prime(items.clone()))
                .ok_or_else(|| ValidationError::new("prime must be an array")),
            Operation::Lcm(value) => integer_array(value, "lcm").map(BfhlRequest::Lcm),
            Operation::Hcf(value) => integer_array(value, "hcf").map(BfhlRequest::Hcf),
            Operation::Ai(value) => value
                .as_str()
                .filter(|question| !question.trim().is_empty())
                .map(|question| BfhlRequest::Ai(question.to_string()))
                .ok_or_else(|| ValidationError::new("AI must be a non-empty string")),
        }
    }
}

/// A validated request, one variant per operation.
#[derive(Debug, Clone, PartialEq)]
pub enum BfhlRequest {
    Fibonacci(i64),
    /// Raw entries; non-integers are dropped by the prime filter.
    Prime(Vec<Value>),
    Lcm(Vec<i64>),
    Hcf(Vec<i64>),
    Ai(String),
}

/// JSON truthiness: `null`, `false`, `0`, `""` and `[]` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Integral value of a JSON number. `7.0` counts as `7`; `2.5` and non-numbers do not.
pub fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        let f = n.as_f64()?;
        let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
        (f.fract() == 0.0 && in_range).then_some(f as i64)
    })
}

/// Leading integer of the value's text form, the way a loosely typed client
/// reads it: `"12abc"` is 12, `"0x10"` is 16, `7.9` is 7, `[5]` is 5 and
/// `1e21` is 1. Values whose text starts with no digits have no reading.
fn parse_leading_integer(value: &Value) -> Option<i64> {
    leading_integer(&text_form(value))
}

/// Text a value turns into when coerced to a string.
fn text_form(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        // Null entries print as nothing; nested arrays flatten.
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => text_form(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest decimal text; exponent notation outside `[1e-6, 1e21)`.
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    let magnitude = f.abs();
    if magnitude >= 1e21 || (magnitude < 1e-6 && magnitude != 0.0) {
        format!("{:e}", f)
    } else {
        f.to_string()
    }
}

/// Optional sign, then decimal digits or `0x`-prefixed hex digits.
/// Saturates instead of overflowing.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_len = rest
        .chars()
        .take_while(|c| c.is_ascii() && c.is_digit(radix))
        .count();
    if digits_len == 0 {
        return None;
    }
    let digits = &rest[..digits_len];
    let parsed = if negative {
        i64::from_str_radix(&format!("-{}", digits), radix).unwrap_or(i64::MIN)
    } else {
        i64::from_str_radix(digits, radix).unwrap_or(i64::MAX)
    };
    Some(parsed)
}

fn integer_array(value: &Value, key: &str) -> Result<Vec<i64>, ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError(format!("{} must be an array", key)))?;
    items
        .iter()
        .map(as_integer)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ValidationError(format!("{} must be an array of integers", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn select_name(body: Value) -> Option<&'static str> {
        Operation::select(&body).map(|op| op.name())
    }

    #[test]
    fn priority_order_is_fixed() {
        assert_eq!(
            select_name(json!({ "AI": "q", "hcf": [1], "lcm": [1], "prime": [2], "fibonacci": 3 })),
            Some("fibonacci")
        );
        assert_eq!(
            select_name(json!({ "AI": "q", "hcf": [1], "lcm": [1], "prime": [2] })),
            Some("prime")
        );
        assert_eq!(select_name(json!({ "AI": "q", "hcf": [1], "lcm": [1] })), Some("lcm"));
        assert_eq!(select_name(json!({ "AI": "q", "hcf": [1] })), Some("hcf"));
        assert_eq!(select_name(json!({ "AI": "q" })), Some("AI"));
    }

    #[test]
    fn fibonacci_is_selected_by_definedness() {
        assert_eq!(select_name(json!({ "fibonacci": 0, "prime": [2, 3] })), Some("fibonacci"));
        assert_eq!(select_name(json!({ "fibonacci": null, "prime": [2] })), Some("fibonacci"));
        assert_eq!(select_name(json!({ "fibonacci": false })), Some("fibonacci"));
    }

    #[test]
    fn falsy_values_fall_through() {
        assert_eq!(select_name(json!({ "prime": [], "lcm": [4, 6] })), Some("lcm"));
        assert_eq!(select_name(json!({ "prime": 0, "lcm": "", "hcf": [2] })), Some("hcf"));
        assert_eq!(select_name(json!({ "hcf": null, "AI": "why" })), Some("AI"));
        assert_eq!(select_name(json!({ "prime": false })), None);
        assert_eq!(select_name(json!({ "AI": null })), None);
    }

    #[test]
    fn empty_ai_string_is_still_selected() {
        assert_eq!(select_name(json!({ "AI": "" })), Some("AI"));
    }

    #[test]
    fn non_objects_select_nothing() {
        assert_eq!(select_name(json!({})), None);
        assert_eq!(select_name(json!([{ "fibonacci": 3 }])), None);
        assert_eq!(select_name(json!("fibonacci")), None);
        assert_eq!(select_name(json!({ "Fibonacci": 3, "ai": "q" })), None);
    }

    #[test]
    fn fibonacci_value_parsing() {
        let parse = |v: Value| Operation::Fibonacci(&v).validate();
        assert_eq!(parse(json!(7)), Ok(BfhlRequest::Fibonacci(7)));
        assert_eq!(parse(json!(7.9)), Ok(BfhlRequest::Fibonacci(7)));
        assert_eq!(parse(json!(-2)), Ok(BfhlRequest::Fibonacci(-2)));
        assert_eq!(parse(json!("12")), Ok(BfhlRequest::Fibonacci(12)));
        assert_eq!(parse(json!("  12abc")), Ok(BfhlRequest::Fibonacci(12)));
        assert_eq!(parse(json!("-3")), Ok(BfhlRequest::Fibonacci(-3)));

        let invalid = Err(ValidationError::new("fibonacci must be a number"));
        assert_eq!(parse(json!("abc")), invalid);
        assert_eq!(parse(json!("")), invalid);
        assert_eq!(parse(json!(null)), invalid);
        assert_eq!(parse(json!(true)), invalid);
        assert_eq!(parse(json!({ "n": 3 })), invalid);
        assert_eq!(parse(json!([])), invalid);
        assert_eq!(parse(json!("0x")), invalid);
    }

    #[test]
    fn fibonacci_reads_hex_and_single_element_arrays() {
        let parse = |v: Value| Operation::Fibonacci(&v).validate();
        assert_eq!(parse(json!("0x10")), Ok(BfhlRequest::Fibonacci(16)));
        assert_eq!(parse(json!(" -0XfZ")), Ok(BfhlRequest::Fibonacci(-15)));
        assert_eq!(parse(json!([5])), Ok(BfhlRequest::Fibonacci(5)));
        assert_eq!(parse(json!(["8", 2])), Ok(BfhlRequest::Fibonacci(8)));
        assert_eq!(parse(json!([[3]])), Ok(BfhlRequest::Fibonacci(3)));
        assert_eq!(
            parse(json!([null, 4])),
            Err(ValidationError::new("fibonacci must be a number"))
        );
    }

    #[test]
    fn fibonacci_reads_exponent_text_of_extreme_numbers() {
        let parse = |v: Value| Operation::Fibonacci(&v).validate();
        assert_eq!(parse(json!(1e21)), Ok(BfhlRequest::Fibonacci(1)));
        assert_eq!(parse(json!(5e-7)), Ok(BfhlRequest::Fibonacci(5)));
        assert_eq!(parse(json!(1e20)), Ok(BfhlRequest::Fibonacci(i64::MAX)));
        assert_eq!(parse(json!("99999999999999999999")), Ok(BfhlRequest::Fibonacci(i64::MAX)));
        assert_eq!(parse(json!("-99999999999999999999")), Ok(BfhlRequest::Fibonacci(i64::MIN)));
    }

    #[test]
    fn array_operations_require_arrays() {
        let value = json!("2,3");
        assert_eq!(
            Operation::Prime(&value).validate(),
            Err(ValidationError::new("prime must be an array"))
        );
        assert_eq!(
            Operation::Lcm(&value).validate(),
            Err(ValidationError::new("lcm must be an array"))
        );
        assert_eq!(
            Operation::Hcf(&value).validate(),
            Err(ValidationError::new("hcf must be an array"))
        );
    }

    #[test]
    fn reductions_require_integers() {
        let value = json!([4, "6"]);
        assert_eq!(
            Operation::Lcm(&value).validate(),
            Err(ValidationError::new("lcm must be an array of integers"))
        );
        let value = json!([12, 1.5]);
        assert_eq!(
            Operation::Hcf(&value).validate(),
            Err(ValidationError::new("hcf must be an array of integers"))
        );
        let value = json!([12, 18.0]);
        assert_eq!(Operation::Hcf(&value).validate(), Ok(BfhlRequest::Hcf(vec![12, 18])));
    }

    #[test]
    fn ai_requires_non_empty_text() {
        let invalid = Err(ValidationError::new("AI must be a non-empty string"));
        for value in [json!(""), json!("   "), json!(42), json!(["q"])] {
            assert_eq!(Operation::Ai(&value).validate(), invalid);
        }
        let value = json!("Capital of France?");
        assert_eq!(
            Operation::Ai(&value).validate(),
            Ok(BfhlRequest::Ai("Capital of France?".to_string()))
        );
    }

    #[test]
    fn integral_numbers_only() {
        assert_eq!(as_integer(&json!(7)), Some(7));
        assert_eq!(as_integer(&json!(7.0)), Some(7));
        assert_eq!(as_integer(&json!(-3)), Some(-3));
        assert_eq!(as_integer(&json!(2.5)), None);
        assert_eq!(as_integer(&json!("7")), None);
        assert_eq!(as_integer(&json!(1e300)), None);
    }
}
