//! patho-eval
//!
//! 병리 이미지 정성 평가 수집 도구 (분할 / 샘플링 / 평가 세션 / 동기화)

pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod ledger;
pub mod manifest;
pub mod runner;
pub mod sampler;
pub mod scanner;
pub mod session;
pub mod splitter;
pub mod sync;
