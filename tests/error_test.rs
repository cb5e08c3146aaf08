//! 에러 케이스 테스트
//!
//! 각종 에러 조건에서의 에러 처리를 검증

use patho_eval::config::Config;
use patho_eval::error::PathoEvalError;
use patho_eval::session::{SessionError, SessionOptions, SessionState, Track, UserAction};
use patho_eval::{manifest, scanner};
use std::path::Path;
use tempfile::tempdir;

/// 존재하지 않는 폴더를 스캔
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_image_dir(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(PathoEvalError::FolderNotFound(_))));
}

/// 이미지가 없는 폴더는 에러가 아니라 빈 목록
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_image_dir(dir.path());
    assert!(result.unwrap().is_empty());
}

/// 매니페스트가 없으면 경로가 담긴 에러
#[test]
fn test_missing_manifest() {
    let err = manifest::read_pairs(Path::new("/nonexistent/image_pairs.csv")).unwrap_err();
    match &err {
        PathoEvalError::ManifestLoad { path, .. } => assert!(path.contains("image_pairs.csv")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(format!("{}", err).contains("image_pairs.csv"));
}

/// 헤더가 맞지 않는 매니페스트
#[test]
fn test_malformed_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("blind_images.csv");
    std::fs::write(&path, "image_path,label\na.png,maybe\n").unwrap();

    let err = manifest::read_blind(&path).unwrap_err();
    assert!(matches!(err, PathoEvalError::ManifestLoad { .. }));
}

/// 지정한 설정 파일이 없으면 에러, 깨진 JSON 도 에러
#[test]
fn test_config_errors() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("none.json");
    assert!(matches!(
        Config::load(Some(&missing)),
        Err(PathoEvalError::FileNotFound(_))
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ invalid }").unwrap();
    assert!(matches!(
        Config::load(Some(&broken)),
        Err(PathoEvalError::JsonParse(_))
    ));
}

/// Display 가 비어 있지 않은지
#[test]
fn test_error_display() {
    let errors = vec![
        PathoEvalError::Config("테스트 설정 에러".to_string()),
        PathoEvalError::FileNotFound("patch_inventory.csv".to_string()),
        PathoEvalError::FolderNotFound("/path/to/folder".to_string()),
        PathoEvalError::ImageProcess("decode".to_string()),
        PathoEvalError::Sync("quota".to_string()),
        PathoEvalError::Prompt("not a terminal".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "에러 메시지가 비어 있음: {:?}", err);
    }
}

/// 거부된 세션 동작은 상태 머신 에러로 전달된다
#[test]
fn test_session_error_is_transparent() {
    let state = SessionState::new(Vec::new(), Vec::new(), Vec::new(), SessionOptions::default());
    let rejected = state.apply(UserAction::Refresh).unwrap_err();
    assert_eq!(rejected, SessionError::IdentityRequired);

    let err: PathoEvalError = SessionError::TrackExhausted(Track::Blind).into();
    assert!(matches!(err, PathoEvalError::Session(_)));
    assert_eq!(
        format!("{}", err),
        format!("{}", SessionError::TrackExhausted(Track::Blind))
    );
}

/// IO 에러에서 변환
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PathoEvalError = io_err.into();

    assert!(matches!(err, PathoEvalError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// common::Error 에서 변환
#[test]
fn test_common_error_conversion() {
    let err: PathoEvalError = patho_eval_common::Error::MissingIdentity.into();
    assert!(matches!(err, PathoEvalError::Common(_)));
    assert!(format!("{}", err).contains("소속"));
}
