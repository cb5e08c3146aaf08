//! 합성 이미지 분할 + 매니페스트 갱신
//!
//! 좌우로 붙은 이미지(왼쪽=실제, 오른쪽=가상)를 반으로 잘라 저장하고
//! 실험 1/2 매니페스트에 행을 추가한다. 이미 등록된 쌍은 건너뛰므로
//! 몇 번이고 다시 실행해도 된다.

use crate::error::{PathoEvalError, Result};
use crate::manifest;
use crate::scanner;
use image::DynamicImage;
use patho_eval_common::{BlindManifestEntry, HalfLabel, PairManifestEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 분할 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub added: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
}

/// 입력 파일명 → (왼쪽, 오른쪽) 저장 경로
pub fn half_paths(split_dir: &Path, file_name: &str) -> (PathBuf, PathBuf) {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    (
        split_dir.join(format!("{}_left.png", stem)),
        split_dir.join(format!("{}_right.png", stem)),
    )
}

/// 가로 기준으로 반을 자른다. 폭이 홀수면 오른쪽이 1px 넓다.
pub fn split_halves(img: &DynamicImage) -> (DynamicImage, DynamicImage) {
    let (w, h) = (img.width(), img.height());
    let mid = w / 2;
    (img.crop_imm(0, 0, mid, h), img.crop_imm(mid, 0, w - mid, h))
}

fn split_one(source: &Path, left: &Path, right: &Path) -> Result<()> {
    let img = image::open(source)
        .map_err(|e| PathoEvalError::ImageProcess(format!("{}: {}", source.display(), e)))?;
    let (left_img, right_img) = split_halves(&img);
    left_img
        .save(left)
        .map_err(|e| PathoEvalError::ImageProcess(format!("{}: {}", left.display(), e)))?;
    right_img
        .save(right)
        .map_err(|e| PathoEvalError::ImageProcess(format!("{}: {}", right.display(), e)))?;
    Ok(())
}

/// new_image_dir 의 이미지를 분할하고 두 매니페스트를 갱신
pub fn split_and_update(
    new_image_dir: &Path,
    split_dir: &Path,
    pair_csv: &Path,
    blind_csv: &Path,
) -> Result<SplitReport> {
    std::fs::create_dir_all(split_dir)?;

    let mut pairs = manifest::load_pairs_or_empty(pair_csv)?;
    let mut blind = manifest::load_blind_or_empty(blind_csv)?;
    let images = scanner::scan_image_dir(new_image_dir)?;

    let mut report = SplitReport::default();

    for image in &images {
        let (left, right) = half_paths(split_dir, &image.file_name);
        let real_path = left.display().to_string();
        let virtual_path = right.display().to_string();

        let exists = pairs
            .iter()
            .any(|p| p.real_path == real_path && p.virtual_path == virtual_path);
        if exists {
            debug!(file = %image.file_name, "already split, skipping");
            report.skipped += 1;
            continue;
        }

        if let Err(e) = split_one(&image.path, &left, &right) {
            warn!(file = %image.file_name, error = %e, "failed to split image");
            report.failed.push(image.file_name.clone());
            continue;
        }

        pairs.push(PairManifestEntry {
            real_path: real_path.clone(),
            virtual_path: virtual_path.clone(),
        });
        blind.push(BlindManifestEntry { image_path: real_path, label: HalfLabel::Real });
        blind.push(BlindManifestEntry { image_path: virtual_path, label: HalfLabel::Fake });
        report.added += 1;
    }

    manifest::write_pairs(pair_csv, &pairs)?;
    manifest::write_blind(blind_csv, &blind)?;

    Ok(report)
}
