//! 결과 파일 → 워크북 동기화 통합 테스트

use patho_eval::config::Config;
use patho_eval::ledger::Ledger;
use patho_eval::runner::sync_targets;
use patho_eval::sync::{SyncBridge, XlsxWorkbookSink};
use patho_eval_common::{BlindRecord, HalfLabel, Prediction, Score, SimilarityRecord};
use tempfile::tempdir;

fn similarity(score: u8, comment: &str) -> SimilarityRecord {
    SimilarityRecord {
        evaluator: "김철수".into(),
        affiliation: "병리과".into(),
        real_path: "p_left.png".into(),
        virtual_path: "p_right.png".into(),
        score: Score::try_from(score).unwrap(),
        comment: comment.into(),
    }
}

#[test]
fn test_sync_uploads_both_ledgers() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config {
        result_dir: dir.path().join("results"),
        ..Default::default()
    };

    Ledger::new(config.similarity_ledger())
        .append_all(&[similarity(4, "clear"), similarity(1, "blurry")])
        .unwrap();
    Ledger::new(config.blind_ledger())
        .append(&BlindRecord {
            evaluator: "김철수".into(),
            affiliation: "병리과".into(),
            image_path: "p_left.png".into(),
            label: HalfLabel::Real,
            prediction: Prediction::Virtual,
        })
        .unwrap();

    let workbook_dir = dir.path().join("sheets");
    let mut bridge = SyncBridge::new(
        XlsxWorkbookSink::new(&workbook_dir),
        "평가 결과",
        sync_targets(&config),
    );
    let report = bridge.sync_all().unwrap();
    assert_eq!(report.uploaded, vec!["results_ex1", "results_ex2"]);
    assert!(report.skipped.is_empty());

    let sheets = XlsxWorkbookSink::read_sheets(&bridge.sink().workbook_path("평가 결과")).unwrap();
    assert_eq!(sheets.len(), 2);

    let (name, rows) = &sheets[0];
    assert_eq!(name, "results_ex1");
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        vec!["evaluator", "affiliation", "real_path", "virtual_path", "score", "comment"]
    );
    assert_eq!(rows[1][4], "4");
    assert_eq!(rows[2][5], "blurry");

    let (name, rows) = &sheets[1];
    assert_eq!(name, "results_ex2");
    assert_eq!(rows[1][3], "real");
    assert_eq!(rows[1][4], "가상");

    // 다시 동기화하면 시트를 교체할 뿐 늘어나지 않는다
    bridge.sync_all().unwrap();
    let sheets = XlsxWorkbookSink::read_sheets(&bridge.sink().workbook_path("평가 결과")).unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].1.len(), 3);
}

#[test]
fn test_sync_skips_missing_ledger() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config {
        result_dir: dir.path().join("results"),
        ..Default::default()
    };
    Ledger::new(config.similarity_ledger()).append(&similarity(3, "ok")).unwrap();

    let mut bridge = SyncBridge::new(
        XlsxWorkbookSink::new(dir.path().join("sheets")),
        "평가 결과",
        sync_targets(&config),
    );
    let report = bridge.sync_all().unwrap();
    assert_eq!(report.uploaded, vec!["results_ex1"]);
    assert_eq!(report.skipped, vec!["results_ex2"]);
}
