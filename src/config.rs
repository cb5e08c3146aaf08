//! 설정 파일 (JSON)
//!
//! `--config` 로 지정하거나 `~/.config/patho-eval/config.json` 을 읽는다.
//! 파일이 없거나 일부 항목이 빠져 있으면 기본값을 사용한다.

use crate::error::{PathoEvalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 유무 판정 트랙의 진행 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceMode {
    /// 한 장씩 제출 (수정 불가)
    Single,
    /// 배치 단위 제출, 이전 배치로 돌아가 수정 가능
    #[default]
    Batched,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pair_manifest: PathBuf,
    pub blind_manifest: PathBuf,
    /// 분할 전 원본(합성) 이미지 폴더
    pub new_image_dir: PathBuf,
    pub split_dir: PathBuf,
    pub result_dir: PathBuf,
    pub presence_image_dir: PathBuf,
    pub presence_mode: PresenceMode,
    pub presence_batch_size: usize,
    pub blind_shuffle_seed: u64,
    pub sampling: SamplingConfig,
    pub sync: SyncConfig,
}

/// 층화 샘플링 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub inventory_csv: PathBuf,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub output_csv: PathBuf,
    /// (염색 × 클래스) 버킷당 최대 샘플 수
    pub sample_n: usize,
    pub seed: u64,
}

/// 스프레드시트 동기화 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub spreadsheet_name: String,
    /// 워크북 파일을 둘 폴더
    pub workbook_dir: PathBuf,
    pub similarity_worksheet: String,
    pub blind_worksheet: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pair_manifest: PathBuf::from("data/image_pairs.csv"),
            blind_manifest: PathBuf::from("data/blind_images.csv"),
            new_image_dir: PathBuf::from("data/new_images"),
            split_dir: PathBuf::from("data/split_images"),
            result_dir: PathBuf::from("results"),
            presence_image_dir: PathBuf::from("data/task_1_glomerulus"),
            presence_mode: PresenceMode::default(),
            presence_batch_size: 10,
            blind_shuffle_seed: 42,
            sampling: SamplingConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            inventory_csv: PathBuf::from("sampling/patch_binary.csv"),
            source_dir: PathBuf::from("sampling/input"),
            dest_dir: PathBuf::from("data/task_1_glomerulus"),
            output_csv: PathBuf::from("sampling/sampled_patches.csv"),
            sample_n: 20,
            seed: 42,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            spreadsheet_name: "가상염색 평가 결과".into(),
            workbook_dir: PathBuf::from("results"),
            similarity_worksheet: "results_ex1".into(),
            blind_worksheet: "results_ex2".into(),
        }
    }
}

impl Config {
    /// 설정 로드 (파일이 없으면 기본값)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            if path.is_some() {
                return Err(PathoEvalError::FileNotFound(config_path.display().to_string()));
            }
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PathoEvalError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("patho-eval").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.presence_batch_size == 0 {
            return Err(PathoEvalError::Config(
                "presence_batch_size 는 1 이상이어야 합니다".into(),
            ));
        }
        if self.sampling.sample_n == 0 {
            return Err(PathoEvalError::Config(
                "sampling.sample_n 은 1 이상이어야 합니다".into(),
            ));
        }
        Ok(())
    }

    pub fn similarity_ledger(&self) -> PathBuf {
        self.result_dir.join("results_ex1.csv")
    }

    pub fn blind_ledger(&self) -> PathBuf {
        self.result_dir.join("results_ex2.csv")
    }

    pub fn presence_ledger(&self) -> PathBuf {
        self.result_dir.join("results_presence.csv")
    }
}
