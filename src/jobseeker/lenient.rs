//! Field decoders that fall back to the empty value instead of failing the record.
//!
//! Records written before the registration form validated its input can hold `null`
//! where a list is expected, or a bare string where a nested block is expected.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// `null` or a mis-shaped value decodes as `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Repeated entries. Anything but an array is an empty list; an element that does not
/// decode becomes a hole so later slots keep their position.
pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value::<Option<T>>(item).ok().flatten())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Block {
        count: i64,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Holder {
        #[serde(deserialize_with = "or_default")]
        block: Option<Block>,
        #[serde(deserialize_with = "entries")]
        items: Vec<Option<Block>>,
    }

    #[test]
    fn null_and_wrong_shapes_fall_back() {
        let holder: Holder = serde_json::from_value(json!({ "block": "oops", "items": null })).unwrap();
        assert!(holder.block.is_none());
        assert!(holder.items.is_empty());

        let holder: Holder = serde_json::from_value(json!({ "block": null, "items": "x" })).unwrap();
        assert!(holder.block.is_none());
        assert!(holder.items.is_empty());
    }

    #[test]
    fn bad_entries_become_holes() {
        let holder: Holder =
            serde_json::from_value(json!({ "items": [{ "count": 1 }, "junk", null, { "count": 4 }] })).unwrap();
        let counts: Vec<Option<i64>> = holder.items.iter().map(|b| b.as_ref().map(|b| b.count)).collect();
        assert_eq!(counts, vec![Some(1), None, None, Some(4)]);
    }
}
