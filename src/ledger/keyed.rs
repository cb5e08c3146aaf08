//! 키 기준 upsert 결과 파일
//!
//! upsert 할 때마다 파일을 다시 읽어 인덱스를 만든다. 다른 평가자 세션이
//! 그 사이에 쓴 행도 유지된다. 같은 키의 기존 행을 모두 지우고 새 행을
//! 끝에 붙인 뒤, 임시 파일에 쓰고 rename 으로 교체한다 (배치 하나당 한 번).

use super::{ensure_parent, Ledger};
use crate::error::Result;
use patho_eval_common::PresenceRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// upsert 키를 가진 행
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for PresenceRecord {
    fn key(&self) -> &str {
        &self.image_path
    }
}

#[derive(Debug)]
pub struct KeyedLedger<R> {
    ledger: Ledger<R>,
    /// 삽입 순번 → 행 (파일 순서 유지)
    rows: BTreeMap<u64, R>,
    /// 키 → 해당 키를 가진 행의 순번들
    index: HashMap<String, Vec<u64>>,
    next_seq: u64,
}

impl<R> KeyedLedger<R>
where
    R: Keyed + Serialize + DeserializeOwned,
{
    /// 파일이 없으면 빈 상태로 시작
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self {
            ledger: Ledger::new(path),
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        };
        store.reload()?;
        Ok(store)
    }

    /// 파일 내용으로 메모리 상태를 다시 만든다
    fn reload(&mut self) -> Result<()> {
        let existing = self.ledger.read_all()?;
        self.rows.clear();
        self.index.clear();
        self.next_seq = 0;
        for row in existing {
            self.push(row);
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.ledger.path()
    }

    /// 마지막으로 읽거나 쓴 시점의 행 수
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Vec<&R> {
        self.index
            .get(key)
            .map(|seqs| seqs.iter().filter_map(|s| self.rows.get(s)).collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    fn push(&mut self, row: R) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.entry(row.key().to_string()).or_default().push(seq);
        self.rows.insert(seq, row);
    }

    fn remove_key(&mut self, key: &str) {
        if let Some(seqs) = self.index.remove(key) {
            for seq in seqs {
                self.rows.remove(&seq);
            }
        }
    }

    /// 같은 키의 기존 행을 지우고 새 행을 추가한 뒤 파일에 반영
    pub fn upsert_all(&mut self, records: Vec<R>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.reload()?;
        for record in records {
            self.remove_key(record.key());
            self.push(record);
        }
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let path = self.ledger.path();
        ensure_parent(path)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            for row in self.rows.values() {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
