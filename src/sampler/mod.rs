//! 층화 랜덤 샘플링
//!
//! 패치 인벤토리를 클래스(positive/negative) × 염색 그룹으로 나누고,
//! 버킷마다 최대 N개를 비복원 추출한다. 시드가 같고 입력 순서가 같으면
//! 결과도 같다.
//!
//! ## 처리 순서
//! 1. 인벤토리 CSV 읽기
//! 2. 클래스 분리
//! 3. 염색 그룹 분류 + 통계 출력
//! 4. 버킷별 샘플링 (positive → negative)
//! 5. 샘플 매니페스트 저장
//! 6. 샘플 파일 복사

mod copy;

pub use copy::{copy_sampled_files, CopyReport};

use crate::config::SamplingConfig;
use crate::error::{PathoEvalError, Result};
use patho_eval_common::{classify_stain, PatchClass, PatchRecord, SampledItem, StainGroup};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// 클래스별로 나눈 패치 이름
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSplit {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    /// mask_binary 가 0/1 이 아닌 행 수
    pub excluded: usize,
}

/// 염색 그룹 → 패치 이름 (모든 그룹이 항상 존재)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StainBuckets(BTreeMap<StainGroup, Vec<String>>);

impl StainBuckets {
    #[cfg(test)]
    fn get(&self, group: StainGroup) -> &[String] {
        self.0.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// HE, PAS, AFOG, P-M, Others 순
    pub fn iter(&self) -> impl Iterator<Item = (StainGroup, &[String])> {
        self.0.iter().map(|(g, v)| (*g, v.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// 샘플링 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingReport {
    pub source_total: usize,
    pub classified_total: usize,
    pub sampled: Vec<SampledItem>,
    pub copy: CopyReport,
}

pub fn read_inventory(path: &Path) -> Result<Vec<PatchRecord>> {
    if !path.exists() {
        return Err(PathoEvalError::FileNotFound(path.display().to_string()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<PatchRecord>, _>>()?;
    Ok(records)
}

/// 인벤토리 순서를 유지한 채 클래스별로 분리
pub fn split_by_class(records: &[PatchRecord]) -> ClassSplit {
    let mut split = ClassSplit::default();
    for record in records {
        match PatchClass::from_mask(record.mask_binary) {
            Some(PatchClass::Positive) => split.positive.push(record.patch_name.clone()),
            Some(PatchClass::Negative) => split.negative.push(record.patch_name.clone()),
            None => split.excluded += 1,
        }
    }
    split
}

pub fn classify_by_stain(names: &[String]) -> StainBuckets {
    let mut buckets: BTreeMap<StainGroup, Vec<String>> =
        StainGroup::ALL.iter().map(|g| (*g, Vec::new())).collect();
    for name in names {
        buckets
            .entry(classify_stain(name))
            .or_default()
            .push(name.clone());
    }
    StainBuckets(buckets)
}

/// 버킷마다 min(cap, 크기)개를 비복원 추출
pub fn sample_by_stain(
    buckets: &StainBuckets,
    cap: usize,
    class: PatchClass,
    rng: &mut StdRng,
) -> Vec<SampledItem> {
    let mut sampled = Vec::new();
    for (stain, names) in buckets.iter() {
        let amount = cap.min(names.len());
        sampled.extend(names.choose_multiple(rng, amount).map(|name| SampledItem {
            patch_name: name.clone(),
            stain,
            class,
        }));
    }
    sampled
}

/// positive 버킷 → negative 버킷 순으로 같은 RNG 를 이어서 사용
pub fn sample_classes(
    positive: &StainBuckets,
    negative: &StainBuckets,
    cap: usize,
    seed: u64,
) -> Vec<SampledItem> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sampled = sample_by_stain(positive, cap, PatchClass::Positive, &mut rng);
    sampled.extend(sample_by_stain(negative, cap, PatchClass::Negative, &mut rng));
    sampled
}

/// 인벤토리 전체를 샘플링
pub fn stratified_sample(records: &[PatchRecord], cap: usize, seed: u64) -> Vec<SampledItem> {
    let split = split_by_class(records);
    sample_classes(
        &classify_by_stain(&split.positive),
        &classify_by_stain(&split.negative),
        cap,
        seed,
    )
}

pub fn write_samples(items: &[SampledItem], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(["patch_name", "stain", "class"])?;
    for item in items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(())
}

fn log_stain_stats(buckets: &StainBuckets, class: PatchClass) {
    info!("[{} samples]", class);
    for (stain, names) in buckets.iter() {
        if names.is_empty() {
            info!("  {}: 0", stain);
        } else {
            let examples: Vec<&str> = names.iter().take(3).map(String::as_str).collect();
            info!("  {}: {} (예: {})", stain, names.len(), examples.join(", "));
        }
    }
}

/// 인벤토리 읽기부터 파일 복사까지 전체 실행
pub fn run_sampling(config: &SamplingConfig) -> Result<SamplingReport> {
    // 1. 인벤토리
    let records = read_inventory(&config.inventory_csv)?;

    // 2. 클래스 분리
    let split = split_by_class(&records);
    info!(
        positive = split.positive.len(),
        negative = split.negative.len(),
        "split inventory by class"
    );
    if split.excluded > 0 {
        warn!(rows = split.excluded, "rows with mask_binary other than 0/1 were excluded");
    }

    // 3. 염색 그룹 분류
    let pos_buckets = classify_by_stain(&split.positive);
    let neg_buckets = classify_by_stain(&split.negative);
    log_stain_stats(&pos_buckets, PatchClass::Positive);
    log_stain_stats(&neg_buckets, PatchClass::Negative);

    let source_total = split.positive.len() + split.negative.len();
    let classified_total = pos_buckets.total() + neg_buckets.total();
    if source_total == classified_total {
        info!(total = classified_total, "stain classification covers every patch");
    } else {
        warn!(source_total, classified_total, "stain classification count mismatch");
    }

    // 4. 샘플링
    let sampled = sample_classes(&pos_buckets, &neg_buckets, config.sample_n, config.seed);

    // 5. 매니페스트 저장 (복사 실패와 무관하게 남긴다)
    write_samples(&sampled, &config.output_csv)?;
    info!(
        path = %config.output_csv.display(),
        count = sampled.len(),
        "wrote sample manifest"
    );

    // 6. 복사
    let copy = copy_sampled_files(&sampled, &config.source_dir, &config.dest_dir)?;

    Ok(SamplingReport {
        source_total,
        classified_total,
        sampled,
        copy,
    })
}
