//! 스프레드시트 동기화
//!
//! 결과 CSV 전체를 읽어 지정한 워크시트 내용을 통째로 교체한다.
//! 로컬 CSV 가 원본이며, 동기화가 실패해도 로컬 파일은 건드리지 않는다.
//! 첫 번째 시트만 성공하고 두 번째가 실패하면 다음 실행까지 내용이 어긋난다.

mod xlsx;

pub use xlsx::XlsxWorkbookSink;

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 워크시트 교체 대상
pub trait SheetSink {
    /// 워크시트가 없으면 만들고, 있으면 내용을 `rows` 로 교체
    fn replace_worksheet(
        &mut self,
        spreadsheet: &str,
        worksheet: &str,
        rows: &[Vec<String>],
    ) -> Result<()>;
}

/// (결과 파일, 워크시트 이름)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub csv_path: PathBuf,
    pub worksheet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: Vec<String>,
    pub skipped: Vec<String>,
}

/// 헤더 + 데이터 행. 짧은 행은 빈 문자열로 채운다.
pub fn read_table(csv_path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    Ok(rows)
}

pub struct SyncBridge<S> {
    sink: S,
    spreadsheet_name: String,
    targets: Vec<SyncTarget>,
}

impl<S: SheetSink> SyncBridge<S> {
    pub fn new(sink: S, spreadsheet_name: impl Into<String>, targets: Vec<SyncTarget>) -> Self {
        Self {
            sink,
            spreadsheet_name: spreadsheet_name.into(),
            targets,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 모든 대상을 순서대로 업로드. 첫 실패에서 멈춘다.
    pub fn sync_all(&mut self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for target in &self.targets {
            if !target.csv_path.exists() {
                warn!(path = %target.csv_path.display(), "ledger not found, skipping worksheet");
                report.skipped.push(target.worksheet.clone());
                continue;
            }

            let rows = read_table(&target.csv_path)?;
            self.sink
                .replace_worksheet(&self.spreadsheet_name, &target.worksheet, &rows)?;
            info!(
                spreadsheet = %self.spreadsheet_name,
                worksheet = %target.worksheet,
                rows = rows.len(),
                "worksheet replaced"
            );
            report.uploaded.push(target.worksheet.clone());
        }

        Ok(report)
    }
}
