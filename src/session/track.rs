//! 트랙별 진행 상태

use patho_eval_common::Presence;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

/// 한 항목씩 진행하는 커서
///
/// 커서는 줄지 않고 항목 수를 넘지 않는다. `cursor == len` 이면 완료.
#[derive(Debug, Clone)]
pub struct CursorTrack<T> {
    items: Arc<[T]>,
    cursor: usize,
}

impl<T> CursorTrack<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_exhausted() {
            self.cursor += 1;
        }
    }
}

/// 배치 단위로 진행하는 유무 판정 트랙
///
/// 응답은 항목 인덱스 기준으로 세션 동안 유지되므로 이전 배치로 돌아가도
/// 고른 값이 그대로 보인다. 고르지 않은 항목은 첫 번째 선택지(있다).
#[derive(Debug, Clone)]
pub struct BatchedTrack {
    items: Arc<[String]>,
    batch_size: usize,
    batch_index: usize,
    answers: BTreeMap<usize, Presence>,
}

impl BatchedTrack {
    pub fn new(items: Vec<String>, batch_size: usize) -> Self {
        Self {
            items: items.into(),
            batch_size: batch_size.max(1),
            batch_index: 0,
            answers: BTreeMap::new(),
        }
    }

    pub fn batch_index(&self) -> usize {
        self.batch_index
    }

    pub fn total_batches(&self) -> usize {
        self.items.len().div_ceil(self.batch_size)
    }

    pub fn is_exhausted(&self) -> bool {
        self.batch_index * self.batch_size >= self.items.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.batch_index > 0
    }

    /// 현재 배치의 항목 인덱스 범위 (마지막 배치는 짧을 수 있음)
    pub fn current_range(&self) -> Range<usize> {
        let start = (self.batch_index * self.batch_size).min(self.items.len());
        let end = (start + self.batch_size).min(self.items.len());
        start..end
    }

    pub fn item(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn answer(&self, index: usize) -> Presence {
        self.answers.get(&index).copied().unwrap_or_default()
    }

    pub(crate) fn set_answer(&mut self, index: usize, answer: Presence) {
        self.answers.insert(index, answer);
    }

    pub(crate) fn next_batch(&mut self) {
        if !self.is_exhausted() {
            self.batch_index += 1;
        }
    }

    pub(crate) fn previous_batch(&mut self) {
        if self.can_go_back() {
            self.batch_index -= 1;
        }
    }
}
