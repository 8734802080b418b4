//! Text parsing conversions.
//!
//! Every converter here maps `Null` and blank text to `Null`, and rejects
//! non-text input.

use chrono::NaiveDate;

use morphic_core::{CANONICAL_DATE_FORMAT, ConvertError, Converter, Value};

use super::{NumberKind, TwoWayConverter};

/// Trimmed text, or `None` for `Null` and blank input.
fn text(value: &Value) -> Result<Option<&str>, ConvertError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then_some(trimmed))
        }
        other => Err(ConvertError::unexpected("string", other)),
    }
}

/// Parses `true/on/yes/1` and `false/off/no/0`, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextToBoolean;

impl Converter for TextToBoolean {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        let Some(s) = text(value)? else {
            return Ok(Value::Null);
        };
        match s.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "off" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(ConvertError::parse(s, "Boolean", "not a boolean literal")),
        }
    }
}

/// Parses decimal or hexadecimal (`0x`, `#`) numbers.
///
/// Integral targets are range-checked. Floating point targets also accept
/// decimal fractions and exponents.
#[derive(Debug, Clone, Copy)]
pub struct TextToNumber {
    target: NumberKind,
}

impl TextToNumber {
    pub fn new(target: NumberKind) -> Self {
        Self { target }
    }

    pub fn target(&self) -> NumberKind {
        self.target
    }
}

/// Parse an integer literal with optional sign and hex prefix.
fn parse_integer(s: &str, expected: &'static str) -> Option<Result<i128, ConvertError>> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let hex = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .or_else(|| digits.strip_prefix('#'))?;
    // from_str_radix takes its own sign, which would allow "-0x-5"
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(Err(ConvertError::parse(s, expected, "invalid hex digit")));
    }
    Some(
        i128::from_str_radix(hex, 16)
            .map(|n| if negative { -n } else { n })
            .map_err(|e| ConvertError::parse(s, expected, e)),
    )
}

impl Converter for TextToNumber {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        let Some(s) = text(value)? else {
            return Ok(Value::Null);
        };
        let expected = self.target.name();

        if let Some(hex) = parse_integer(s, expected) {
            return self.target.from_integer(hex?);
        }

        if self.target.is_integral() {
            let n = s
                .parse::<i128>()
                .map_err(|e| ConvertError::parse(s, expected, e))?;
            self.target.from_integer(n)
        } else {
            let v = s
                .parse::<f64>()
                .map_err(|e| ConvertError::parse(s, expected, e))?;
            self.target.from_float(v)
        }
    }
}

/// Parses exactly one character.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextToCharacter;

impl Converter for TextToCharacter {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        // Whitespace is a valid character, so only the empty string is blank here
        let s = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(s) if s.is_empty() => return Ok(Value::Null),
            Value::String(s) => s,
            other => return Err(ConvertError::unexpected("string", other)),
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Char(c)),
            _ => Err(ConvertError::parse(s, "Character", "expected exactly one character")),
        }
    }
}

/// Parses dates with a chrono format pattern.
///
/// The reverse direction formats a date with the same pattern, so one
/// instance can back a two-way registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToDate {
    pattern: String,
}

impl Default for TextToDate {
    fn default() -> Self {
        Self::with_pattern(CANONICAL_DATE_FORMAT)
    }
}

impl TextToDate {
    /// Parse `%Y-%m-%d`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Converter for TextToDate {
    fn convert(&self, value: &Value) -> Result<Value, ConvertError> {
        let Some(s) = text(value)? else {
            return Ok(Value::Null);
        };
        NaiveDate::parse_from_str(s, &self.pattern)
            .map(Value::Date)
            .map_err(|e| ConvertError::parse(s, "Date", e))
    }
}

impl TwoWayConverter for TextToDate {
    fn convert_forward(&self, value: &Value) -> Result<Value, ConvertError> {
        self.convert(value)
    }

    fn convert_reverse(&self, value: &Value) -> Result<Value, ConvertError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Date(d) => Ok(Value::String(d.format(&self.pattern).to_string())),
            other => Err(ConvertError::unexpected("date", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn boolean_literals() {
        for input in ["true", "ON", "Yes", "1", " true "] {
            assert_eq!(TextToBoolean.convert(&s(input)).unwrap(), Value::Bool(true));
        }
        for input in ["false", "off", "NO", "0"] {
            assert_eq!(TextToBoolean.convert(&s(input)).unwrap(), Value::Bool(false));
        }
        assert!(TextToBoolean.convert(&s("maybe")).is_err());
    }

    #[test]
    fn blank_and_null_are_null() {
        assert_eq!(TextToBoolean.convert(&s("  ")).unwrap(), Value::Null);
        assert_eq!(TextToBoolean.convert(&Value::Null).unwrap(), Value::Null);
        assert_eq!(
            TextToNumber::new(NumberKind::Integer).convert(&s("")).unwrap(),
            Value::Null
        );
        assert_eq!(TextToDate::new().convert(&s(" ")).unwrap(), Value::Null);
    }

    #[test]
    fn integers() {
        let int = TextToNumber::new(NumberKind::Integer);
        assert_eq!(int.convert(&s("42")).unwrap(), Value::Int32(42));
        assert_eq!(int.convert(&s("-7")).unwrap(), Value::Int32(-7));
        assert_eq!(int.convert(&s("0x1F")).unwrap(), Value::Int32(31));
        assert_eq!(int.convert(&s("#ff")).unwrap(), Value::Int32(255));
        assert_eq!(int.convert(&s("-0x10")).unwrap(), Value::Int32(-16));
    }

    #[test]
    fn malformed_integer_fails() {
        let int = TextToNumber::new(NumberKind::Integer);
        let err = int.convert(&s("abc")).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { expected: "Integer", .. }));
        assert!(int.convert(&s("1.5")).is_err());
        assert!(int.convert(&s("0xZZ")).is_err());
        assert!(int.convert(&s("0x")).is_err());
    }

    #[test]
    fn hex_body_cannot_carry_a_second_sign() {
        let int = TextToNumber::new(NumberKind::Integer);
        for input in ["0x-5", "-0x-5", "#+5", "-#-10", "+0x+1", "0x 5"] {
            let err = int.convert(&s(input)).unwrap_err();
            assert!(
                matches!(err, ConvertError::Parse { expected: "Integer", .. }),
                "{input} parsed"
            );
        }
        assert_eq!(int.convert(&s("+0x5")).unwrap(), Value::Int32(5));
        assert_eq!(int.convert(&s("-#a")).unwrap(), Value::Int32(-10));
    }

    #[test]
    fn integer_range() {
        let byte = TextToNumber::new(NumberKind::Byte);
        assert_eq!(byte.convert(&s("-128")).unwrap(), Value::Int8(-128));
        assert!(matches!(
            byte.convert(&s("300")),
            Err(ConvertError::OutOfRange { target: "Byte", .. })
        ));
    }

    #[test]
    fn floating_point() {
        let double = TextToNumber::new(NumberKind::Double);
        assert_eq!(double.convert(&s("2.5e2")).unwrap(), Value::Double(250.0));
        assert_eq!(double.convert(&s("0x10")).unwrap(), Value::Double(16.0));

        let float = TextToNumber::new(NumberKind::Float);
        assert_eq!(float.convert(&s("0.25")).unwrap(), Value::Float(0.25));
        assert!(float.convert(&s("nope")).is_err());
    }

    #[test]
    fn non_text_rejected() {
        assert!(matches!(
            TextToNumber::new(NumberKind::Long).convert(&Value::Int32(1)),
            Err(ConvertError::UnexpectedValue { expected: "string", found: "int32" })
        ));
    }

    #[test]
    fn characters() {
        assert_eq!(TextToCharacter.convert(&s("x")).unwrap(), Value::Char('x'));
        assert_eq!(TextToCharacter.convert(&s(" ")).unwrap(), Value::Char(' '));
        assert_eq!(TextToCharacter.convert(&s("")).unwrap(), Value::Null);
        assert!(TextToCharacter.convert(&s("xy")).is_err());
    }

    #[test]
    fn dates_with_patterns() {
        let iso = TextToDate::new();
        let us = TextToDate::with_pattern("%m/%d/%Y");
        let expected = Value::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        assert_eq!(iso.convert(&s("2024-03-09")).unwrap(), expected);
        assert_eq!(us.convert(&s("03/09/2024")).unwrap(), expected);
        assert!(iso.convert(&s("03/09/2024")).is_err());
    }

    #[test]
    fn date_reverse_formats_with_pattern() {
        let us = TextToDate::with_pattern("%m/%d/%Y");
        let date = Value::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(us.convert_reverse(&date).unwrap(), s("03/09/2024"));
        assert_eq!(us.convert_reverse(&Value::Null).unwrap(), Value::Null);
    }
}
