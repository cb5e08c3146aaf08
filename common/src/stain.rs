//! 염색 그룹 분류
//!
//! 패치 파일명에 포함된 키워드로 염색 프로토콜을 판별한다.
//! 키워드 표는 순서가 의미를 가진다 (첫 번째로 일치한 그룹이 채택됨).

use serde::{Deserialize, Serialize};
use std::fmt;

/// 염색 그룹
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StainGroup {
    #[serde(rename = "HE")]
    He,
    #[serde(rename = "PAS")]
    Pas,
    #[serde(rename = "AFOG")]
    Afog,
    #[serde(rename = "P-M")]
    PM,
    #[serde(rename = "Others")]
    Others,
}

/// (그룹, 키워드) 표. 위에서부터 검사한다.
pub const STAIN_KEYWORDS: &[(StainGroup, &[&str])] = &[
    (StainGroup::He, &["HE", "H-E"]),
    (StainGroup::Pas, &["PAS"]),
    (StainGroup::Afog, &["AFOG"]),
    (StainGroup::PM, &["P-M", "MS", "PAMS"]),
];

impl StainGroup {
    /// 버킷 순회 순서
    pub const ALL: [StainGroup; 5] = [
        StainGroup::He,
        StainGroup::Pas,
        StainGroup::Afog,
        StainGroup::PM,
        StainGroup::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StainGroup::He => "HE",
            StainGroup::Pas => "PAS",
            StainGroup::Afog => "AFOG",
            StainGroup::PM => "P-M",
            StainGroup::Others => "Others",
        }
    }
}

impl fmt::Display for StainGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 파일명으로 염색 그룹을 판별 (대소문자 무시, 첫 일치 우선, 없으면 Others)
pub fn classify_stain(patch_name: &str) -> StainGroup {
    let upper = patch_name.to_uppercase();
    STAIN_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| upper.contains(&kw.to_uppercase()))
        })
        .map(|(group, _)| *group)
        .unwrap_or(StainGroup::Others)
}
