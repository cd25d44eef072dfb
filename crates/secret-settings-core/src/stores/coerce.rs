//! Conversions applied by `get_value`

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::error::{SettingsError, SettingsResult};

/// Caller supplied conversion
pub type CoerceFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Target type for `SettingsStore::get_value`
#[derive(Clone)]
pub enum Coercion {
    /// Render as a string; non-strings become their JSON text
    Str,
    /// Convert to an integer (floats truncate, strings are parsed)
    Int,
    /// Convert to a finite float
    Float,
    /// Always rejected; use `get_bool` instead
    Bool,
    /// Convert to a list (strings split into characters, mappings into keys)
    List,
    /// Named caller supplied conversion
    Custom { name: String, func: CoerceFn },
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl Coercion {
    /// Build a named custom coercion
    pub fn custom<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Coercion::Custom {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Coercion::Str => "str",
            Coercion::Int => "int",
            Coercion::Float => "float",
            Coercion::Bool => "bool",
            Coercion::List => "list",
            Coercion::Custom { name, .. } => name,
        }
    }

    /// Convert `value` to this target
    pub fn apply(&self, value: Value) -> SettingsResult<Value> {
        match self {
            Coercion::Str => Ok(to_str(value)),
            Coercion::Int => to_int(value),
            Coercion::Float => to_float(value),
            Coercion::Bool => Err(SettingsError::DoNotCoerceBool),
            Coercion::List => to_list(value),
            Coercion::Custom { name, func } => {
                func(value).map_err(|message| SettingsError::coercion(name.as_str(), message))
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

fn unsupported(target: &str, value: &Value) -> SettingsError {
    SettingsError::coercion(target, format!("unsupported value type {}", kind_of(value)))
}

fn to_str(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    }
}

fn to_int(value: Value) -> SettingsResult<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
        Value::Number(n) => {
            let f = n.as_f64().unwrap_or(f64::NAN);
            if !f.is_finite() || f < i64::MIN as f64 || f > i64::MAX as f64 {
                return Err(SettingsError::coercion("int", format!("{n} is out of range")));
            }
            Ok(Value::from(f.trunc() as i64))
        }
        Value::Bool(b) => Ok(Value::from(i64::from(b))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| SettingsError::coercion("int", format!("invalid literal [{s}]"))),
        other => Err(unsupported("int", &other)),
    }
}

fn to_float(value: Value) -> SettingsResult<Value> {
    let f = match &value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => Some(
            s.trim()
                .parse::<f64>()
                .map_err(|_| SettingsError::coercion("float", format!("invalid literal [{s}]")))?,
        ),
        other => return Err(unsupported("float", other)),
    };
    f.and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| SettingsError::coercion("float", "value is not a finite number"))
}

fn to_list(value: Value) -> SettingsResult<Value> {
    match value {
        Value::Array(items) => Ok(Value::Array(items)),
        Value::String(s) => Ok(Value::Array(
            s.chars().map(|c| Value::String(c.to_string())).collect(),
        )),
        Value::Object(map) => Ok(Value::Array(map.into_iter().map(|(k, _)| Value::String(k)).collect())),
        other => Err(unsupported("list", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str() {
        assert_eq!(Coercion::Str.apply(json!("10")).unwrap(), json!("10"));
        assert_eq!(Coercion::Str.apply(json!(10)).unwrap(), json!("10"));
        assert_eq!(Coercion::Str.apply(json!(true)).unwrap(), json!("true"));
    }

    #[test]
    fn test_int() {
        assert_eq!(Coercion::Int.apply(json!("11")).unwrap(), json!(11));
        assert_eq!(Coercion::Int.apply(json!(" 42 ")).unwrap(), json!(42));
        assert_eq!(Coercion::Int.apply(json!(3.9)).unwrap(), json!(3));
        assert_eq!(Coercion::Int.apply(json!(true)).unwrap(), json!(1));
        assert!(matches!(
            Coercion::Int.apply(json!("nan")),
            Err(SettingsError::Coercion { .. })
        ));
        assert!(Coercion::Int.apply(json!([1])).is_err());
    }

    #[test]
    fn test_float() {
        assert_eq!(Coercion::Float.apply(json!("2.5")).unwrap(), json!(2.5));
        assert_eq!(Coercion::Float.apply(json!(2)).unwrap(), json!(2.0));
        assert!(Coercion::Float.apply(json!("nan")).is_err());
        assert!(Coercion::Float.apply(json!("[1,2,3]")).is_err());
        assert!(Coercion::Float.apply(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_list() {
        assert_eq!(
            Coercion::List.apply(json!("list")).unwrap(),
            json!(["l", "i", "s", "t"])
        );
        assert_eq!(Coercion::List.apply(json!({"a": 1})).unwrap(), json!(["a"]));
        assert!(Coercion::List.apply(json!(9)).is_err());
    }

    #[test]
    fn test_bool_rejected() {
        assert!(matches!(
            Coercion::Bool.apply(json!("true")),
            Err(SettingsError::DoNotCoerceBool)
        ));
    }

    #[test]
    fn test_custom() {
        let upper = Coercion::custom("upper", |v| {
            v.as_str()
                .map(|s| Value::String(s.to_uppercase()))
                .ok_or_else(|| "expected a string".to_string())
        });
        assert_eq!(upper.apply(json!("abc")).unwrap(), json!("ABC"));

        let err = upper.apply(json!(1)).unwrap_err();
        assert!(matches!(err, SettingsError::Coercion { ref target, .. } if target == "upper"));
        assert_eq!(format!("{:?}", upper), "Custom { name: \"upper\" }");
    }
}
