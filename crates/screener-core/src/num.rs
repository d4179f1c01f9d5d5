//! 수치 변환 헬퍼.
//!
//! 외부 소스(CSV, JSON)의 값을 `f64`로 변환합니다. 변환 실패나 비유한값(NaN, inf)은
//! 센티널 값이 아닌 `None`으로 처리합니다.

use serde::{Deserialize, Deserializer};

/// 유한값만 통과.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// 문자열을 유한 `f64`로 파싱.
pub fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().and_then(finite)
}

/// 관대한 `Option<f64>` 역직렬화.
///
/// 빈 필드, 숫자가 아닌 값, 비유한값은 모두 `None`이 됩니다.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_finite))
}

/// 내림차순 정렬용 비교 (값이 없으면 가장 낮은 값으로 취급).
pub fn cmp_desc_missing_last(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite("18.5"), Some(18.5));
        assert_eq!(parse_finite(" -3 "), Some(-3.0));
        assert_eq!(parse_finite(""), None);
        assert_eq!(parse_finite("n/a"), None);
        assert_eq!(parse_finite("NaN"), None);
        assert_eq!(parse_finite("inf"), None);
    }

    #[test]
    fn test_cmp_desc_missing_last() {
        assert_eq!(cmp_desc_missing_last(Some(2.0), Some(1.0)), Ordering::Less);
        assert_eq!(cmp_desc_missing_last(Some(-5.0), None), Ordering::Less);
        assert_eq!(cmp_desc_missing_last(None, Some(-5.0)), Ordering::Greater);
        assert_eq!(cmp_desc_missing_last(None, None), Ordering::Equal);
    }
}
