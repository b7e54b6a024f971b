use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::file_format::SerdeFormat;

pub type Result<T> = anyhow::Result<T>;

pub fn serialize<T: Serialize>(value: &T, format: SerdeFormat) -> Result<Vec<u8>> {
    let text = match format {
        SerdeFormat::Yaml => serde_yml::to_string(value)?,
        SerdeFormat::Json => serde_json::to_string_pretty(value)?,
    };

    Ok(text.into_bytes())
}

pub fn deserialize<T: DeserializeOwned>(serialized: &[u8], format: SerdeFormat) -> Result<T> {
    let text = std::str::from_utf8(serialized)?;
    match format {
        SerdeFormat::Yaml => Ok(serde_yml::from_str(text)?),
        SerdeFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn json_and_yaml_roundtrip() {
        let mut value = BTreeMap::new();
        value.insert("threshold".to_string(), vec![1, 254]);

        for format in [SerdeFormat::Json, SerdeFormat::Yaml] {
            let bytes = serialize(&value, format).unwrap();
            let restored: BTreeMap<String, Vec<i32>> = deserialize(&bytes, format).unwrap();
            assert_eq!(restored, value);
        }
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let result: Result<BTreeMap<String, i32>> = deserialize(&[0xff, 0xfe], SerdeFormat::Json);
        assert!(result.is_err());
    }
}
