//! 평가 결과 저장 (CSV)
//!
//! - `Ledger`: 추가 전용. 파일이 없거나 비어 있으면 헤더부터 쓴다.
//! - `KeyedLedger`: image_path 기준 upsert (배치형 유무 판정 트랙).
//!
//! 한 파일에 동시에 쓰는 프로세스는 하나라고 가정한다. 여러 세션이 같은
//! 파일을 동시에 갱신하면 나중에 쓴 쪽이 이긴다.

mod keyed;

pub use keyed::{Keyed, KeyedLedger};

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::OpenOptions;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 추가 전용 결과 파일
#[derive(Debug, Clone)]
pub struct Ledger<R> {
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R> Ledger<R>
where
    R: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn has_rows(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    pub fn append(&self, record: &R) -> Result<()> {
        self.append_all(std::slice::from_ref(record))
    }

    pub fn append_all(&self, records: &[R]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        ensure_parent(&self.path)?;

        let write_header = !self.has_rows();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 파일이 없으면 빈 목록
    pub fn read_all(&self) -> Result<Vec<R>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<R>, _>>()?;
        Ok(rows)
    }
}
