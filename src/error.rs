use crate::session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathoEvalError {
    #[error("설정 에러: {0}")]
    Config(String),

    #[error("파일을 찾을 수 없습니다: {0}")]
    FileNotFound(String),

    #[error("폴더를 찾을 수 없습니다: {0}")]
    FolderNotFound(String),

    #[error("매니페스트를 읽을 수 없습니다: {path} ({reason})")]
    ManifestLoad { path: String, reason: String },

    #[error("이미지 처리 에러: {0}")]
    ImageProcess(String),

    #[error("스프레드시트 동기화 에러: {0}")]
    Sync(String),

    #[error("입력 에러: {0}")]
    Prompt(String),

    #[error("CSV 에러: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 파싱 에러: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 에러: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Common(#[from] patho_eval_common::Error),
}

pub type Result<T> = std::result::Result<T, PathoEvalError>;
