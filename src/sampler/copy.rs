//! 샘플 파일 복사
//!
//! 원본이 없는 파일은 경고만 남기고 계속 진행한다.

use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use patho_eval_common::SampledItem;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub missing: Vec<PathBuf>,
}

pub fn copy_sampled_files(
    items: &[SampledItem],
    src_dir: &Path,
    dst_dir: &Path,
) -> Result<CopyReport> {
    std::fs::create_dir_all(dst_dir)?;

    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("  {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut report = CopyReport::default();
    for item in items {
        let src = src_dir.join(&item.patch_name);
        if src.is_file() {
            std::fs::copy(&src, dst_dir.join(&item.patch_name))?;
            report.copied += 1;
        } else {
            warn!(path = %src.display(), "sampled file is missing at source");
            report.missing.push(src);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(report)
}
