//! Serde helpers for hand-edited YAML files
//!
//! Operators write `version: 1.0` or leave a list key empty; both must load.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

/// Accept a string, number, or bool and keep it as text.
pub(crate) fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a scalar, found {other:?}"
            )));
        }
    })
}

/// Treat an explicit `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// List of scalars where numbers are allowed, e.g. `plugins: [Foo, 1.0]`.
pub(crate) fn scalar_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a component token, found {other:?}"
            ))),
        })
        .collect()
}

/// Parse YAML where an empty document means the default value.
pub(crate) fn from_str_or_default<T>(text: &str) -> Result<T, serde_yaml::Error>
where
    T: serde::de::DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        Ok(T::default())
    } else {
        serde_yaml::from_str(text)
    }
}
