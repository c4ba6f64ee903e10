//! Campos de actualización parcial
//!
//! Un campo `Option<Option<T>>` distingue tres casos en el JSON:
//! ausente (`None`), `null` (`Some(None)`) y valor (`Some(Some(v))`).
//! Se usa con `#[serde(default, deserialize_with = "double_option")]`.

use serde::{Deserialize, Deserializer};

pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "double_option")]
        remarks: Option<Option<String>>,
    }

    #[test]
    fn test_absent_null_and_value() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.remarks, None);

        let null: Probe = serde_json::from_str(r#"{"remarks": null}"#).unwrap();
        assert_eq!(null.remarks, Some(None));

        let value: Probe = serde_json::from_str(r#"{"remarks": "ok"}"#).unwrap();
        assert_eq!(value.remarks, Some(Some("ok".to_string())));
    }
}
