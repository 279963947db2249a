//! Cell values as handed over by a decoder, and their text rendering.

use std::fmt;

/// One cell of one column.
///
/// Decoders map their physical/logical types onto these variants; anything
/// without a direct counterpart arrives pre-rendered as [`Value::Formatted`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Already rendered by the decoder (dates, decimals, nested values, ...).
    Formatted(String),
}

impl Value {
    /// Text form written to the output. Null renders as the empty string.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Boolean(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float32(f) => render_float(*f),
            Self::Float(f) => render_float(*f),
            Self::Text(s) | Self::Formatted(s) => s.clone(),
            Self::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

/// Shortest round-trip form; exponent notation (`1e+21`, `1.5e-07`) outside
/// `1e-4 <= |v| < 1e21`.
fn render_float<F: fmt::Display + fmt::LowerExp>(v: F) -> String {
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return match sci.as_str() {
            "inf" => "+Inf".to_string(),
            "-inf" => "-Inf".to_string(),
            _ => "NaN".to_string(),
        };
    };
    match exp.parse::<i32>() {
        Ok(e) if !(-4..21).contains(&e) => {
            let sign = if e < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", e.unsigned_abs())
        }
        _ => v.to_string(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
