//! 화면 표현 (상태의 순수 투영)

use super::{PresenceTrack, SessionState};
use patho_eval_common::{PairManifestEntry, Presence};

/// 커서 트랙 한 개의 표시 내용
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackView<T> {
    Pending {
        /// 1부터 시작
        position: usize,
        total: usize,
        item: T,
    },
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemView {
    pub index: usize,
    pub image_path: String,
    pub answer: Presence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceView {
    Single(TrackView<String>),
    Batch {
        /// 1부터 시작
        batch_number: usize,
        total_batches: usize,
        items: Vec<BatchItemView>,
        can_go_back: bool,
    },
    BatchComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub identity_required: bool,
    pub similarity: TrackView<PairManifestEntry>,
    /// 정답 라벨은 보여주지 않는다
    pub blind: TrackView<String>,
    pub presence: PresenceView,
    pub synced: bool,
}

fn track_view<T, U>(track: &super::CursorTrack<T>, project: impl Fn(&T) -> U) -> TrackView<U> {
    match track.current() {
        Some(item) => TrackView::Pending {
            position: track.cursor() + 1,
            total: track.len(),
            item: project(item),
        },
        None => TrackView::Complete,
    }
}

pub fn render(state: &SessionState) -> SessionView {
    let presence = match state.presence() {
        PresenceTrack::Single(track) => PresenceView::Single(track_view(track, Clone::clone)),
        PresenceTrack::Batched(track) if track.is_exhausted() => PresenceView::BatchComplete,
        PresenceTrack::Batched(track) => PresenceView::Batch {
            batch_number: track.batch_index() + 1,
            total_batches: track.total_batches(),
            items: track
                .current_range()
                .filter_map(|i| {
                    track.item(i).map(|path| BatchItemView {
                        index: i,
                        image_path: path.to_string(),
                        answer: track.answer(i),
                    })
                })
                .collect(),
            can_go_back: track.can_go_back(),
        },
    };

    SessionView {
        identity_required: state.identity().is_none(),
        similarity: track_view(state.similarity(), Clone::clone),
        blind: track_view(state.blind(), |entry| entry.image_path.clone()),
        presence,
        synced: state.is_synced(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionOptions, UserAction};
    use patho_eval_common::{BlindManifestEntry, HalfLabel};

    #[test]
    fn test_render_before_identity() {
        let state = SessionState::new(vec![], vec![], vec![], SessionOptions::default());
        let view = render(&state);
        assert!(view.identity_required);
        assert_eq!(view.similarity, TrackView::Complete);
        assert_eq!(view.presence, PresenceView::BatchComplete);
    }

    #[test]
    fn test_blind_view_hides_label() {
        let blind = vec![BlindManifestEntry {
            image_path: "x_right.png".into(),
            label: HalfLabel::Fake,
        }];
        let state = SessionState::new(vec![], blind, vec![], SessionOptions::default());
        assert_eq!(
            render(&state).blind,
            TrackView::Pending { position: 1, total: 1, item: "x_right.png".to_string() }
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let items: Vec<String> = (0..3).map(|i| format!("g{}.png", i)).collect();
        let state = SessionState::new(vec![], vec![], items, SessionOptions::default())
            .apply(UserAction::SetIdentity { name: "a".into(), affiliation: "b".into() })
            .unwrap()
            .state;
        assert_eq!(render(&state), render(&state));

        let refreshed = state.apply(UserAction::Refresh).unwrap();
        assert_eq!(render(&refreshed.state), render(&state));
    }
}
