//! patho-eval Common Library
//!
//! 평가 세션과 오프라인 도구가 공유하는 타입과 유틸리티

pub mod error;
pub mod stain;
pub mod types;

pub use error::{Error, Result};
pub use stain::{classify_stain, StainGroup, STAIN_KEYWORDS};
pub use types::{
    BlindManifestEntry, BlindRecord, EvaluatorIdentity, HalfLabel, PairManifestEntry, PatchClass,
    PatchRecord, Prediction, Presence, PresenceRecord, SampledItem, Score, SimilarityRecord,
};
