//! 헤드라인 감성 분석.
//!
//! VADER 사전 기반 compound 점수를 사용합니다. 사전은 생성 시 한 번 로드되고
//! 이후에는 읽기 전용이므로 같은 텍스트는 항상 같은 결과를 냅니다.

use vader_sentiment::SentimentIntensityAnalyzer;

use screener_core::SentimentResult;

/// 텍스트 감성 점수 계산기.
///
/// 한 번 생성해 파이프라인 단계에 명시적으로 전달합니다.
pub struct SentimentScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// 텍스트의 극성 점수와 라벨 계산.
    ///
    /// 빈 텍스트는 0.0(중립)입니다.
    pub fn score(&self, text: &str) -> SentimentResult {
        let text = text.trim();
        if text.is_empty() {
            return SentimentResult::from_score(0.0);
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);
        SentimentResult::from_score(compound.clamp(-1.0, 1.0))
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}
