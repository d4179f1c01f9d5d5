//! 정책/스킴 수혜 분석 타입.
//!
//! 뉴스 헤드라인에서 정부 정책 카테고리 키워드를 찾아 종목별 수혜 점수를 매깁니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CoreError, Result};

/// 기본 정책 카테고리별 키워드.
const DEFAULT_POLICY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "capex_infra",
        &[
            "infrastructure",
            "infra",
            "capex",
            "highway",
            "railway",
            "metro",
            "airport",
            "port",
            "construction",
        ],
    ),
    (
        "manufacturing_pli",
        &[
            "pli",
            "production linked incentive",
            "manufacturing",
            "electronics manufacturing",
            "domestic manufacturing",
        ],
    ),
    (
        "defence",
        &["defence", "defense", "defence ministry", "military", "order win"],
    ),
    (
        "energy_transition",
        &[
            "renewable",
            "solar",
            "wind",
            "green hydrogen",
            "battery",
            "ev",
            "energy transition",
        ],
    ),
    (
        "banking_credit",
        &[
            "credit growth",
            "msme",
            "fiscal",
            "budget",
            "policy support",
            "rate cut",
        ],
    ),
    (
        "agri_rural",
        &[
            "agri",
            "agriculture",
            "rural",
            "fertilizer",
            "irrigation",
            "crop",
        ],
    ),
    (
        "healthcare_pharma",
        &["healthcare", "pharma", "drug policy", "medical devices"],
    ),
];

/// 정책 키워드 설정.
///
/// 설정 로드 시점에 명시적으로 결정됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keywords {
    /// 설정 파일에서 지정한 카테고리 → 키워드 목록
    Provided(BTreeMap<String, Vec<String>>),
    /// 기본 7개 카테고리
    Default,
}

impl Keywords {
    /// 원시 설정값에서 키워드 설정 결정.
    ///
    /// - 없음 / null / 빈 맵 → `Default`
    /// - 모든 값이 문자열 목록인 맵 → `Provided` (소문자 변환, 공백 제거, 빈 키워드 제외)
    /// - 맵이 아니거나 목록이 아닌 값이 있으면 에러
    pub fn resolve(raw: Option<&Value>) -> Result<Self> {
        let map = match raw {
            None | Some(Value::Null) => return Ok(Self::Default),
            Some(Value::Object(map)) if map.is_empty() => return Ok(Self::Default),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(CoreError::InvalidKeywords(format!(
                    "expected a category -> keyword list mapping, got {}",
                    other
                )))
            }
        };

        let mut categories = BTreeMap::new();
        for (category, value) in map {
            let Value::Array(items) = value else {
                return Err(CoreError::InvalidKeywords(format!(
                    "category '{}' must be a list of keywords, got {}",
                    category, value
                )));
            };

            let mut keywords = Vec::with_capacity(items.len());
            for item in items {
                let keyword = match item {
                    Value::String(s) => s.trim().to_lowercase(),
                    Value::Number(n) => n.to_string(),
                    other => {
                        return Err(CoreError::InvalidKeywords(format!(
                            "category '{}' contains a non-string keyword: {}",
                            category, other
                        )))
                    }
                };
                if !keyword.is_empty() {
                    keywords.push(keyword);
                }
            }
            categories.insert(category.clone(), keywords);
        }

        Ok(Self::Provided(categories))
    }

    /// 카테고리 → 키워드 맵 (카테고리명 정렬).
    pub fn categories(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            Self::Provided(map) => map.clone(),
            Self::Default => DEFAULT_POLICY_KEYWORDS
                .iter()
                .map(|(category, words)| {
                    (
                        category.to_string(),
                        words.iter().map(|w| w.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

/// 정책 매칭 입력 행 (회사 뉴스 상세 테이블에서 읽음).
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySourceRow {
    pub symbol: String,
    pub title: String,
    pub link: String,
    pub published: String,
    pub source: String,
    /// 숫자가 아닌 원본 값은 0.0
    pub sentiment_score: f64,
}

/// 정책 키워드가 매칭된 뉴스 근거 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEvidenceRow {
    pub symbol: String,
    pub published: String,
    pub title: String,
    pub link: String,
    pub source: String,
    pub sentiment_score: f64,
    /// 정렬·중복 제거된 카테고리 (`, ` 구분)
    pub matched_categories: String,
    pub policy_row_score: f64,
}

/// 수혜 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitBucket {
    #[serde(rename = "High Policy Benefit")]
    HighPolicyBenefit,
    #[serde(rename = "Potential Beneficiary")]
    PotentialBeneficiary,
    #[serde(rename = "Watch")]
    Watch,
}

impl BenefitBucket {
    /// 언급 수와 누적 점수로 등급 결정.
    pub fn classify(scheme_mentions: usize, policy_benefit_score: f64) -> Self {
        if scheme_mentions >= 5 && policy_benefit_score >= 8.0 {
            Self::HighPolicyBenefit
        } else if scheme_mentions >= 2 && policy_benefit_score >= 4.0 {
            Self::PotentialBeneficiary
        } else {
            Self::Watch
        }
    }
}

impl fmt::Display for BenefitBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighPolicyBenefit => write!(f, "High Policy Benefit"),
            Self::PotentialBeneficiary => write!(f, "Potential Beneficiary"),
            Self::Watch => write!(f, "Watch"),
        }
    }
}

/// 심볼별 정책 수혜 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyBenefitSummary {
    pub symbol: String,
    pub scheme_mentions: usize,
    pub avg_scheme_sentiment: f64,
    /// 행 점수 합계
    pub policy_benefit_score: f64,
    /// 전체 행 카테고리 합집합 (`, ` 구분)
    pub matched_categories: String,
    pub top_links: String,
    pub benefit_bucket: BenefitBucket,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(BenefitBucket::classify(5, 8.0), BenefitBucket::HighPolicyBenefit);
        assert_eq!(
            BenefitBucket::classify(5, 7.99),
            BenefitBucket::PotentialBeneficiary
        );
        assert_eq!(BenefitBucket::classify(1, 100.0), BenefitBucket::Watch);
        assert_eq!(BenefitBucket::classify(2, 4.0), BenefitBucket::PotentialBeneficiary);
        assert_eq!(BenefitBucket::classify(2, 3.99), BenefitBucket::Watch);
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(Keywords::resolve(None).unwrap(), Keywords::Default);
        assert_eq!(Keywords::resolve(Some(&Value::Null)).unwrap(), Keywords::Default);
        assert_eq!(Keywords::resolve(Some(&json!({}))).unwrap(), Keywords::Default);

        let categories = Keywords::Default.categories();
        assert_eq!(categories.len(), 7);
        assert!(categories["capex_infra"].contains(&"metro".to_string()));
    }

    #[test]
    fn test_resolve_provided_normalizes() {
        let raw = json!({ "rail": ["  Vande Bharat ", "", "RAILWAY"] });
        let Keywords::Provided(map) = Keywords::resolve(Some(&raw)).unwrap() else {
            panic!("expected provided keywords");
        };
        assert_eq!(map["rail"], vec!["vande bharat", "railway"]);
    }

    #[test]
    fn test_resolve_rejects_non_list_values() {
        let raw = json!({ "rail": "railway" });
        assert!(matches!(
            Keywords::resolve(Some(&raw)),
            Err(CoreError::InvalidKeywords(_))
        ));

        let raw = json!(["railway"]);
        assert!(Keywords::resolve(Some(&raw)).is_err());
    }
}
