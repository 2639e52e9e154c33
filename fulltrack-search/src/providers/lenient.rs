//! Lenient field deserializers for upstream payloads
//!
//! Provider APIs are loose about field types: ids arrive as numbers or
//! strings, numbers as strings, names as single strings or lists. These
//! helpers accept any of those shapes and map the rest to `None`, so one
//! odd field does not discard a whole response. Use with
//! `#[serde(default, deserialize_with = "...")]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// String or number → `Some(String)`; blank strings → `None`
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

/// Like [`opt_string`], additionally joining a list of strings with ", "
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items.into_iter().filter_map(scalar_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Some(other) => scalar_text(other),
        None => None,
    })
}

fn as_u64(value: Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
        }
        _ => None,
    }
}

/// Non-negative number or numeric string → `Some(u64)`
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(as_u64))
}

/// Like [`opt_u64`], `None` when the value does not fit in `u32`
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_u64(deserializer)?.and_then(|n| u32::try_from(n).ok()))
}

/// Boolean, 0/1, or "true"/"false" → `Some(bool)`
pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_i64().map(|i| i != 0),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Whole seconds; zero means the provider did not know
pub fn seconds(value: Option<u32>) -> Option<u32> {
    value.filter(|s| *s > 0)
}

/// Milliseconds → whole seconds (truncating); under one second means unknown
pub fn seconds_from_millis(value: Option<u64>) -> Option<u32> {
    value
        .and_then(|ms| u32::try_from(ms / 1000).ok())
        .filter(|s| *s > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "opt_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "opt_text")]
        creator: Option<String>,
        #[serde(default, deserialize_with = "opt_u32")]
        duration: Option<u32>,
        #[serde(default, deserialize_with = "opt_bool")]
        flag: Option<bool>,
    }

    fn sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_fields_are_none() {
        let p = sample(json!({}));
        assert!(p.id.is_none() && p.creator.is_none() && p.duration.is_none() && p.flag.is_none());
    }

    #[test]
    fn test_ids_from_numbers_and_strings() {
        assert_eq!(sample(json!({"id": 12345})).id.as_deref(), Some("12345"));
        assert_eq!(sample(json!({"id": "abc"})).id.as_deref(), Some("abc"));
        assert_eq!(sample(json!({"id": ""})).id, None);
        assert_eq!(sample(json!({"id": null})).id, None);
        assert_eq!(sample(json!({"id": {"nested": 1}})).id, None);
    }

    #[test]
    fn test_text_lists_are_joined() {
        let p = sample(json!({"creator": ["Artist A", "Artist B"]}));
        assert_eq!(p.creator.as_deref(), Some("Artist A, Artist B"));
        assert_eq!(sample(json!({"creator": []})).creator, None);
    }

    #[test]
    fn test_numbers_from_strings_and_floats() {
        assert_eq!(sample(json!({"duration": "215"})).duration, Some(215));
        assert_eq!(sample(json!({"duration": 215.7})).duration, Some(215));
        assert_eq!(sample(json!({"duration": -3})).duration, None);
        assert_eq!(sample(json!({"duration": "n/a"})).duration, None);
    }

    #[test]
    fn test_bools_from_various_shapes() {
        assert_eq!(sample(json!({"flag": true})).flag, Some(true));
        assert_eq!(sample(json!({"flag": 0})).flag, Some(false));
        assert_eq!(sample(json!({"flag": "TRUE"})).flag, Some(true));
        assert_eq!(sample(json!({"flag": "maybe"})).flag, None);
    }

    #[test]
    fn test_duration_normalization() {
        assert_eq!(seconds(Some(0)), None);
        assert_eq!(seconds(Some(180)), Some(180));
        assert_eq!(seconds_from_millis(Some(215_999)), Some(215));
        assert_eq!(seconds_from_millis(Some(0)), None);
        assert_eq!(seconds_from_millis(Some(500)), None);
        assert_eq!(seconds_from_millis(Some(999)), None);
        assert_eq!(seconds_from_millis(Some(1000)), Some(1));
        assert_eq!(seconds_from_millis(None), None);
    }
}
