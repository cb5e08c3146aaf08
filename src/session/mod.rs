//! 평가 세션 상태 머신
//!
//! `(SessionState, UserAction) -> (SessionState, Vec<Effect>)`.
//! 상태는 세션마다 하나씩 만들어 넘겨받고 돌려준다. 결과 파일 쓰기와
//! 스프레드시트 동기화는 `Effect` 로만 표현하고, 실제 I/O 는 runner 가 한다.
//!
//! ## 트랙
//! - 실험 1 (similarity): 이미지 쌍, 1~5점 + 코멘트
//! - 실험 2 (blind): 고정 시드로 한 번 섞은 단일 이미지, 실제/가상
//! - 유무 판정 (presence): 한 장씩 또는 배치 단위

mod track;
mod view;

pub use track::{BatchedTrack, CursorTrack};
pub use view::{render, PresenceView, SessionView, TrackView};

use crate::config::PresenceMode;
use patho_eval_common::{
    BlindManifestEntry, BlindRecord, EvaluatorIdentity, PairManifestEntry, Prediction, Presence,
    PresenceRecord, Score, SimilarityRecord,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use thiserror::Error;

/// 트랙 구분
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Similarity,
    Blind,
    Presence,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Similarity => write!(f, "실험 1"),
            Track::Blind => write!(f, "실험 2"),
            Track::Presence => write!(f, "유무 판정"),
        }
    }
}

/// 거부된 사용자 동작
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("이름과 소속을 모두 입력해 주세요")]
    IdentityRequired,

    #[error("{0} 평가가 이미 완료되었습니다")]
    TrackExhausted(Track),

    #[error("첫 번째 배치에서는 이전으로 갈 수 없습니다")]
    NoPreviousBatch,

    #[error("현재 배치에 없는 항목입니다: {0}")]
    ItemOutsideBatch(usize),

    #[error("유무 판정 트랙의 진행 방식과 맞지 않는 동작입니다")]
    WrongPresenceMode,
}

/// 사용자 동작
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SetIdentity { name: String, affiliation: String },
    /// 다시 그리기만 한다 (결과 쓰기/커서 이동 없음)
    Refresh,
    SubmitSimilarity { score: Score, comment: String },
    SubmitBlind { prediction: Prediction },
    /// 한 장씩 모드
    SubmitPresence { answer: Presence },
    /// 배치 모드: 현재 배치 안의 항목 응답 변경
    ChoosePresence { index: usize, answer: Presence },
    PreviousBatch,
    /// 배치 모드: 현재 배치 제출 후 다음으로
    NextBatch,
}

/// 상태 전이의 부수 효과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AppendSimilarity(SimilarityRecord),
    AppendBlind(BlindRecord),
    AppendPresence(PresenceRecord),
    UpsertPresence(Vec<PresenceRecord>),
    SyncLedgers,
}

#[derive(Debug, Clone)]
pub enum PresenceTrack {
    Single(CursorTrack<String>),
    Batched(BatchedTrack),
}

impl PresenceTrack {
    pub fn is_exhausted(&self) -> bool {
        match self {
            PresenceTrack::Single(t) => t.is_exhausted(),
            PresenceTrack::Batched(t) => t.is_exhausted(),
        }
    }
}

/// 세션 시작 시 고정되는 값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub presence_mode: PresenceMode,
    pub batch_size: usize,
    pub blind_seed: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            presence_mode: PresenceMode::Batched,
            batch_size: 10,
            blind_seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    identity: Option<EvaluatorIdentity>,
    similarity: CursorTrack<PairManifestEntry>,
    blind: CursorTrack<BlindManifestEntry>,
    presence: PresenceTrack,
    synced: bool,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

/// 고정 시드로 전체를 한 번 섞는다
pub fn shuffle_blind(mut entries: Vec<BlindManifestEntry>, seed: u64) -> Vec<BlindManifestEntry> {
    let mut rng = StdRng::seed_from_u64(seed);
    entries.shuffle(&mut rng);
    entries
}

impl SessionState {
    pub fn new(
        pairs: Vec<PairManifestEntry>,
        blind: Vec<BlindManifestEntry>,
        presence_items: Vec<String>,
        options: SessionOptions,
    ) -> Self {
        let presence = match options.presence_mode {
            PresenceMode::Single => PresenceTrack::Single(CursorTrack::new(presence_items)),
            PresenceMode::Batched => {
                PresenceTrack::Batched(BatchedTrack::new(presence_items, options.batch_size))
            }
        };

        Self {
            identity: None,
            similarity: CursorTrack::new(pairs),
            blind: CursorTrack::new(shuffle_blind(blind, options.blind_seed)),
            presence,
            synced: false,
        }
    }

    pub fn identity(&self) -> Option<&EvaluatorIdentity> {
        self.identity.as_ref()
    }

    pub fn similarity(&self) -> &CursorTrack<PairManifestEntry> {
        &self.similarity
    }

    pub fn blind(&self) -> &CursorTrack<BlindManifestEntry> {
        &self.blind
    }

    pub fn presence(&self) -> &PresenceTrack {
        &self.presence
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// 동기화 조건: 실험 1, 2 가 모두 끝났고 아직 동기화하지 않음
    pub fn sync_due(&self) -> bool {
        !self.synced && self.similarity.is_exhausted() && self.blind.is_exhausted()
    }

    /// 동작 하나를 적용한다. 거부되면 원래 상태는 그대로 남는다.
    pub fn apply(&self, action: UserAction) -> Result<Transition, SessionError> {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match action {
            UserAction::SetIdentity { name, affiliation } => {
                let identity = EvaluatorIdentity::new(name, affiliation)
                    .map_err(|_| SessionError::IdentityRequired)?;
                next.identity = Some(identity);
            }
            action => {
                let identity = next
                    .identity
                    .clone()
                    .ok_or(SessionError::IdentityRequired)?;
                next.apply_track_action(&identity, action, &mut effects)?;
            }
        }

        if next.identity.is_some() && next.sync_due() {
            next.synced = true;
            effects.push(Effect::SyncLedgers);
        }

        Ok(Transition {
            state: next,
            effects,
        })
    }

    fn apply_track_action(
        &mut self,
        identity: &EvaluatorIdentity,
        action: UserAction,
        effects: &mut Vec<Effect>,
    ) -> Result<(), SessionError> {
        match action {
            UserAction::SetIdentity { .. } | UserAction::Refresh => {}

            UserAction::SubmitSimilarity { score, comment } => {
                let pair = self
                    .similarity
                    .current()
                    .ok_or(SessionError::TrackExhausted(Track::Similarity))?;
                effects.push(Effect::AppendSimilarity(SimilarityRecord {
                    evaluator: identity.name.clone(),
                    affiliation: identity.affiliation.clone(),
                    real_path: pair.real_path.clone(),
                    virtual_path: pair.virtual_path.clone(),
                    score,
                    comment,
                }));
                self.similarity.advance();
            }

            UserAction::SubmitBlind { prediction } => {
                let entry = self
                    .blind
                    .current()
                    .ok_or(SessionError::TrackExhausted(Track::Blind))?;
                effects.push(Effect::AppendBlind(BlindRecord {
                    evaluator: identity.name.clone(),
                    affiliation: identity.affiliation.clone(),
                    image_path: entry.image_path.clone(),
                    label: entry.label,
                    prediction,
                }));
                self.blind.advance();
            }

            UserAction::SubmitPresence { answer } => {
                let PresenceTrack::Single(track) = &mut self.presence else {
                    return Err(SessionError::WrongPresenceMode);
                };
                let image_path = track
                    .current()
                    .ok_or(SessionError::TrackExhausted(Track::Presence))?
                    .clone();
                effects.push(Effect::AppendPresence(presence_record(identity, image_path, answer)));
                track.advance();
            }

            UserAction::ChoosePresence { index, answer } => {
                let track = self.batched_mut()?;
                if track.is_exhausted() {
                    return Err(SessionError::TrackExhausted(Track::Presence));
                }
                if !track.current_range().contains(&index) {
                    return Err(SessionError::ItemOutsideBatch(index));
                }
                track.set_answer(index, answer);
            }

            UserAction::PreviousBatch => {
                let track = self.batched_mut()?;
                if !track.can_go_back() {
                    return Err(SessionError::NoPreviousBatch);
                }
                track.previous_batch();
            }

            UserAction::NextBatch => {
                let track = self.batched_mut()?;
                if track.is_exhausted() {
                    return Err(SessionError::TrackExhausted(Track::Presence));
                }
                let records = track
                    .current_range()
                    .filter_map(|i| {
                        let answer = track.answer(i);
                        track
                            .item(i)
                            .map(|path| presence_record(identity, path.to_string(), answer))
                    })
                    .collect();
                effects.push(Effect::UpsertPresence(records));
                track.next_batch();
            }
        }
        Ok(())
    }

    fn batched_mut(&mut self) -> Result<&mut BatchedTrack, SessionError> {
        match &mut self.presence {
            PresenceTrack::Batched(track) => Ok(track),
            PresenceTrack::Single(_) => Err(SessionError::WrongPresenceMode),
        }
    }
}

fn presence_record(
    identity: &EvaluatorIdentity,
    image_path: String,
    answer: Presence,
) -> PresenceRecord {
    PresenceRecord {
        evaluator: identity.name.clone(),
        affiliation: identity.affiliation.clone(),
        image_path,
        answer,
    }
}
