//! 宽松反序列化
//!
//! 后端的数字字段由 LLM 生成，可能是数字也可能是数字字符串。

use serde::de::{self, Visitor};
use serde::Deserializer;
use std::collections::BTreeMap;
use std::fmt;

/// 字符串或整数 → String
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringVisitor;

    impl<'de> Visitor<'de> for StringVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringVisitor)
}

/// 可选版本，`null` 视为 `None`
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_number")] String);

    let value: Option<Wrapper> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.map(|Wrapper(s)| s))
}

/// 数字或数字字符串 → f64，无法解析的字符串视为 0
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.trim().parse().unwrap_or(0.0))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

/// 数字或数字字符串 → u32（小数四舍五入，负数视为 0）
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    })
}

/// 计数表，每个值都按 `lenient_u32` 解析，`null` 视为空表
pub fn lenient_u32_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    struct Count(#[serde(deserialize_with = "lenient_u32")] u32);

    let map: Option<BTreeMap<String, Count>> = serde::Deserialize::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(key, Count(value))| (key, value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "string_or_number")]
        number: String,
        #[serde(deserialize_with = "lenient_u32")]
        marks: u32,
        #[serde(default, deserialize_with = "opt_string_or_number")]
        dataset: Option<String>,
    }

    #[test]
    fn test_numbers_and_strings_are_accepted() {
        let s: Sample =
            serde_json::from_str(r#"{"number": 3, "marks": "15", "dataset": 480}"#).unwrap();
        assert_eq!(s.number, "3");
        assert_eq!(s.marks, 15);
        assert_eq!(s.dataset.as_deref(), Some("480"));

        let s: Sample =
            serde_json::from_str(r#"{"number": "Q3", "marks": 7.6, "dataset": null}"#).unwrap();
        assert_eq!(s.number, "Q3");
        assert_eq!(s.marks, 8);
        assert!(s.dataset.is_none());
    }

    #[test]
    fn test_garbage_marks_become_zero() {
        let s: Sample = serde_json::from_str(r#"{"number": "Q1", "marks": "ten"}"#).unwrap();
        assert_eq!(s.marks, 0);
        assert!(s.dataset.is_none());
    }
}
