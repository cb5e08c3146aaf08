//! 데이터 모델
//!
//! CLI 와 세션 로직이 공유하는 타입:
//! - PatchRecord / SampledItem: 층화 샘플링 입력과 출력
//! - PairManifestEntry / BlindManifestEntry: 평가 목록 매니페스트
//! - SimilarityRecord / BlindRecord / PresenceRecord: 트랙별 평가 결과 행

use crate::error::{Error, Result};
use crate::stain::StainGroup;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 패치 인벤토리의 한 행 (추가 컬럼은 무시)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub patch_name: String,
    pub mask_binary: u8,
}

/// 패치 클래스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchClass {
    Positive,
    Negative,
}

impl PatchClass {
    /// mask_binary 값 → 클래스 (0/1 이외는 None)
    pub fn from_mask(mask_binary: u8) -> Option<Self> {
        match mask_binary {
            1 => Some(PatchClass::Positive),
            0 => Some(PatchClass::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatchClass::Positive => "positive",
            PatchClass::Negative => "negative",
        }
    }
}

impl fmt::Display for PatchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 층화 샘플링 결과 한 건
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledItem {
    pub patch_name: String,
    pub stain: StainGroup,
    pub class: PatchClass,
}

/// 실험 1용: 실제/가상 이미지 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairManifestEntry {
    pub real_path: String,
    pub virtual_path: String,
}

/// 분할된 절반 이미지의 정답 라벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfLabel {
    Real,
    Fake,
}

/// 실험 2용: 단일 이미지 + 정답 라벨
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindManifestEntry {
    pub image_path: String,
    pub label: HalfLabel,
}

/// 평가자 정보 (이름/소속 모두 필수)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorIdentity {
    pub name: String,
    pub affiliation: String,
}

impl EvaluatorIdentity {
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        let affiliation = affiliation.into().trim().to_string();
        if name.is_empty() || affiliation.is_empty() {
            return Err(Error::MissingIdentity);
        }
        Ok(Self { name, affiliation })
    }
}

/// 유사성 점수 (1=전혀 유사하지 않음, 5=매우 유사함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 선택지 전체 (1..=5)
    pub fn all() -> impl Iterator<Item = Score> {
        (Self::MIN..=Self::MAX).map(Score)
    }
}

impl TryFrom<u8> for Score {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Score(value))
        } else {
            Err(Error::Parse(format!(
                "점수는 {}~{} 사이여야 합니다: {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 블라인드 테스트 응답
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prediction {
    #[serde(rename = "실제")]
    Real,
    #[serde(rename = "가상")]
    Virtual,
}

impl Prediction {
    /// 화면 표시 순서 (첫 번째가 기본 선택)
    pub const OPTIONS: [Prediction; 2] = [Prediction::Real, Prediction::Virtual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Real => "실제",
            Prediction::Virtual => "가상",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사구체 유무 응답
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    #[serde(rename = "있다")]
    Present,
    #[serde(rename = "없다")]
    Absent,
}

impl Presence {
    pub const OPTIONS: [Presence; 2] = [Presence::Present, Presence::Absent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Present => "있다",
            Presence::Absent => "없다",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 실험 1 결과 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    pub evaluator: String,
    pub affiliation: String,
    pub real_path: String,
    pub virtual_path: String,
    pub score: Score,
    #[serde(default)]
    pub comment: String,
}

/// 실험 2 결과 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindRecord {
    pub evaluator: String,
    pub affiliation: String,
    pub image_path: String,
    pub label: HalfLabel,
    pub prediction: Prediction,
}

/// 유무 판정 결과 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub evaluator: String,
    pub affiliation: String,
    pub image_path: String,
    pub answer: Presence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_class_from_mask() {
        assert_eq!(PatchClass::from_mask(1), Some(PatchClass::Positive));
        assert_eq!(PatchClass::from_mask(0), Some(PatchClass::Negative));
        assert_eq!(PatchClass::from_mask(2), None);
    }

    #[test]
    fn test_identity_requires_both_fields() {
        assert!(EvaluatorIdentity::new("김철수", "서울대병원").is_ok());
        assert_eq!(
            EvaluatorIdentity::new("", "서울대병원"),
            Err(Error::MissingIdentity)
        );
        assert_eq!(
            EvaluatorIdentity::new("김철수", "   "),
            Err(Error::MissingIdentity)
        );
    }

    #[test]
    fn test_identity_is_trimmed() {
        let identity = EvaluatorIdentity::new("  김철수 ", " 병리과").unwrap();
        assert_eq!(identity.name, "김철수");
        assert_eq!(identity.affiliation, "병리과");
    }

    #[test]
    fn test_score_bounds() {
        assert!(Score::try_from(0).is_err());
        assert_eq!(Score::try_from(1).unwrap().value(), 1);
        assert_eq!(Score::try_from(5).unwrap().value(), 5);
        assert!(Score::try_from(6).is_err());
        assert_eq!(Score::all().count(), 5);
    }

    #[test]
    fn test_score_serde_as_integer() {
        let score = Score::try_from(4).unwrap();
        assert_eq!(serde_json::to_string(&score).unwrap(), "4");
        assert!(serde_json::from_str::<Score>("9").is_err());
    }

    #[test]
    fn test_korean_answer_labels() {
        assert_eq!(serde_json::to_string(&Prediction::Virtual).unwrap(), "\"가상\"");
        assert_eq!(serde_json::to_string(&Presence::Absent).unwrap(), "\"없다\"");
        assert_eq!(Presence::default(), Presence::Present);
        assert_eq!(Prediction::OPTIONS[0], Prediction::Real);
    }

    #[test]
    fn test_sampled_item_serde_names() {
        let item = SampledItem {
            patch_name: "a_PAS.png".into(),
            stain: StainGroup::Pas,
            class: PatchClass::Negative,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"patch_name":"a_PAS.png","stain":"PAS","class":"negative"}"#
        );
    }
}
