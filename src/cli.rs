use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "patho-eval")]
#[command(about = "병리 이미지 정성 평가 수집 도구", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 설정 파일 (기본: ~/.config/patho-eval/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 합성 이미지를 좌우로 분할하고 매니페스트 갱신
    Split {
        /// 원본 이미지 폴더 (기본: 설정값)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 분할 이미지 저장 폴더 (기본: 설정값)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 클래스 × 염색 그룹 층화 샘플링
    Sample {
        /// 버킷당 최대 샘플 수
        #[arg(short = 'n', long)]
        cap: Option<usize>,

        /// 랜덤 시드
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 대화식 평가 세션
    Evaluate {
        /// 평가자 이름
        #[arg(long)]
        name: Option<String>,

        /// 평가자 소속
        #[arg(long)]
        affiliation: Option<String>,
    },

    /// 결과 파일을 스프레드시트로 동기화
    Sync,

    /// 설정 표시/초기화
    Config {
        /// 기본 설정 파일 생성
        #[arg(long)]
        init: bool,

        /// 설정 표시
        #[arg(long)]
        show: bool,
    },
}
