//! 평가 목록 매니페스트 (CSV)
//!
//! - image_pairs.csv: real_path,virtual_path
//! - blind_images.csv: image_path,label

use crate::error::{PathoEvalError, Result};
use patho_eval_common::{BlindManifestEntry, PairManifestEntry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let load_err = |reason: String| PathoEvalError::ManifestLoad {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path).map_err(|e| load_err(e.to_string()))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| load_err(e.to_string()))
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T], header: &[&str]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // 행이 없어도 헤더는 남긴다
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_pairs(path: &Path) -> Result<Vec<PairManifestEntry>> {
    read_rows(path)
}

pub fn read_blind(path: &Path) -> Result<Vec<BlindManifestEntry>> {
    read_rows(path)
}

/// 파일이 없으면 빈 목록
pub fn load_pairs_or_empty(path: &Path) -> Result<Vec<PairManifestEntry>> {
    if path.exists() {
        read_pairs(path)
    } else {
        Ok(Vec::new())
    }
}

pub fn load_blind_or_empty(path: &Path) -> Result<Vec<BlindManifestEntry>> {
    if path.exists() {
        read_blind(path)
    } else {
        Ok(Vec::new())
    }
}

pub fn write_pairs(path: &Path, pairs: &[PairManifestEntry]) -> Result<()> {
    write_rows(path, pairs, &["real_path", "virtual_path"])
}

pub fn write_blind(path: &Path, entries: &[BlindManifestEntry]) -> Result<()> {
    write_rows(path, entries, &["image_path", "label"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use patho_eval_common::HalfLabel;

    #[test]
    fn test_missing_manifest_is_load_error() {
        let result = read_pairs(Path::new("/nonexistent/image_pairs.csv"));
        match result {
            Err(PathoEvalError::ManifestLoad { path, .. }) => {
                assert!(path.contains("image_pairs.csv"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read_blind() {
        let dir = std::env::temp_dir().join("patho-eval-test-manifest");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("blind_images.csv");

        let entries = vec![
            BlindManifestEntry { image_path: "a_left.png".into(), label: HalfLabel::Real },
            BlindManifestEntry { image_path: "a_right.png".into(), label: HalfLabel::Fake },
        ];
        write_blind(&path, &entries).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("image_path,label\n"));
        assert!(text.contains("a_right.png,fake"));
        assert_eq!(read_blind(&path).unwrap(), entries);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_manifest_keeps_header() {
        let dir = std::env::temp_dir().join("patho-eval-test-manifest-empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("image_pairs.csv");

        write_pairs(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "real_path,virtual_path\n");
        assert!(load_pairs_or_empty(&path).unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
