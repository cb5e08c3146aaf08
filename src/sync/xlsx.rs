//! 로컬 워크북 (xlsx) 동기화 대상
//!
//! `<dir>/<스프레드시트 이름>.xlsx` 를 스프레드시트 하나로 본다.
//! 기존 시트는 calamine 으로 읽어 두고, 대상 시트만 교체하거나 새로 추가한 뒤
//! rust_xlsxwriter 로 워크북 전체를 다시 쓴다.

use super::SheetSink;
use crate::error::{PathoEvalError, Result};
use calamine::{open_workbook, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

pub struct XlsxWorkbookSink {
    dir: PathBuf,
}

type Sheet = (String, Vec<Vec<String>>);

/// 숫자 셀로 쓰는 열 (헤더 이름 기준)
const NUMERIC_COLUMNS: &[&str] = &["score"];

fn numeric_columns(rows: &[Vec<String>]) -> Vec<usize> {
    rows.first()
        .map(|header| {
            header
                .iter()
                .enumerate()
                .filter(|(_, name)| NUMERIC_COLUMNS.contains(&name.as_str()))
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default()
}

impl XlsxWorkbookSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn workbook_path(&self, spreadsheet: &str) -> PathBuf {
        self.dir.join(format!("{}.xlsx", spreadsheet))
    }

    /// 워크북의 모든 시트를 문자열 표로 읽는다
    pub fn read_sheets(path: &Path) -> Result<Vec<Sheet>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| PathoEvalError::Sync(format!("워크북 읽기 에러 {}: {}", path.display(), e)))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| PathoEvalError::Sync(format!("시트 읽기 에러 {}: {}", name, e)))?;
            let rows = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            sheets.push((name, rows));
        }
        Ok(sheets)
    }

    fn write_sheets(path: &Path, sheets: &[Sheet]) -> Result<()> {
        let sync_err =
            |e: rust_xlsxwriter::XlsxError| PathoEvalError::Sync(format!("Excel 쓰기 에러: {}", e));

        let mut workbook = Workbook::new();
        for (name, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name).map_err(sync_err)?;

            let numeric = numeric_columns(rows);
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    // 헤더 아래의 숫자 열만 숫자 셀, 나머지는 문자열 그대로
                    let number = match r > 0 && numeric.contains(&c) {
                        true => value.parse::<u32>().ok(),
                        false => None,
                    };
                    let (r, c) = (r as u32, c as u16);
                    match number {
                        Some(n) => worksheet.write_number(r, c, f64::from(n)).map_err(sync_err)?,
                        None => worksheet.write_string(r, c, value).map_err(sync_err)?,
                    };
                }
            }
        }

        workbook.save(path).map_err(sync_err)?;
        Ok(())
    }
}

impl SheetSink for XlsxWorkbookSink {
    fn replace_worksheet(
        &mut self,
        spreadsheet: &str,
        worksheet: &str,
        rows: &[Vec<String>],
    ) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.workbook_path(spreadsheet);

        let mut sheets = Self::read_sheets(&path)?;
        match sheets.iter_mut().find(|(name, _)| name == worksheet) {
            Some((_, existing)) => *existing = rows.to_vec(),
            None => sheets.push((worksheet.to_string(), rows.to_vec())),
        }

        Self::write_sheets(&path, &sheets)
    }
}
