use anyhow::Context;
use clap::Parser;
use patho_eval::{
    cli, config, interactive, manifest, runner, sampler, scanner, session, splitter, sync,
};
use cli::{Cli, Commands};
use config::Config;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_runner(config: &Config) -> anyhow::Result<runner::EffectRunner<sync::XlsxWorkbookSink>> {
    let ledgers = runner::Ledgers::open(config).context("결과 파일을 열 수 없습니다")?;
    let bridge = sync::SyncBridge::new(
        sync::XlsxWorkbookSink::new(&config.sync.workbook_dir),
        config.sync.spreadsheet_name.clone(),
        runner::sync_targets(config),
    );
    Ok(runner::EffectRunner::new(ledgers, bridge))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // --init 은 기존 파일 없이도 동작해야 한다
    let config = if matches!(cli.command, Commands::Config { init: true, .. }) {
        Config::default()
    } else {
        Config::load(cli.config.as_deref()).context("설정을 읽을 수 없습니다")?
    };

    match cli.command {
        Commands::Split { input, output } => {
            println!("✂ patho-eval - 이미지 분할\n");

            let input = input.unwrap_or_else(|| config.new_image_dir.clone());
            let output = output.unwrap_or_else(|| config.split_dir.clone());
            let report = splitter::split_and_update(
                &input,
                &output,
                &config.pair_manifest,
                &config.blind_manifest,
            )?;

            println!(
                "✔ 추가: {}쌍, 건너뜀: {}쌍, 실패: {}개",
                report.added,
                report.skipped,
                report.failed.len()
            );
            println!("✔ {}", config.pair_manifest.display());
            println!("✔ {}", config.blind_manifest.display());
            println!("\n✅ 이미지 분할 및 CSV 업데이트 완료");
        }

        Commands::Sample { cap, seed } => {
            println!("🎲 patho-eval - 층화 샘플링\n");

            let mut sampling = config.sampling.clone();
            if let Some(cap) = cap {
                anyhow::ensure!(cap > 0, "버킷당 샘플 수는 1 이상이어야 합니다");
                sampling.sample_n = cap;
            }
            if let Some(seed) = seed {
                sampling.seed = seed;
            }

            let report = sampler::run_sampling(&sampling)?;
            println!("✔ 분류: {}/{}개", report.classified_total, report.source_total);
            println!("✔ 샘플: {}개 → {}", report.sampled.len(), sampling.output_csv.display());
            println!("✔ 복사: {}개, 누락: {}개", report.copy.copied, report.copy.missing.len());
            println!("\n✅ 샘플링 완료");
        }

        Commands::Evaluate { name, affiliation } => {
            // 매니페스트가 없으면 세션을 시작하지 않는다
            let pairs = manifest::read_pairs(&config.pair_manifest)?;
            let blind = manifest::read_blind(&config.blind_manifest)?;
            let presence_items: Vec<String> = if config.presence_image_dir.is_dir() {
                scanner::scan_image_dir(&config.presence_image_dir)?
                    .iter()
                    .map(scanner::ImageInfo::path_string)
                    .collect()
            } else {
                tracing::warn!(
                    dir = %config.presence_image_dir.display(),
                    "presence image folder not found, track will be empty"
                );
                Vec::new()
            };

            let options = session::SessionOptions {
                presence_mode: config.presence_mode,
                batch_size: config.presence_batch_size,
                blind_seed: config.blind_shuffle_seed,
            };
            let state = session::SessionState::new(pairs, blind, presence_items, options);
            let mut effect_runner = build_runner(&config)?;

            interactive::run_session(state, &mut effect_runner, name, affiliation)?;
        }

        Commands::Sync => {
            println!("☁ patho-eval - 스프레드시트 동기화\n");

            let mut bridge = sync::SyncBridge::new(
                sync::XlsxWorkbookSink::new(&config.sync.workbook_dir),
                config.sync.spreadsheet_name.clone(),
                runner::sync_targets(&config),
            );
            let report = bridge.sync_all()?;
            for sheet in &report.uploaded {
                println!("✔ {}", sheet);
            }
            for sheet in &report.skipped {
                println!("- 건너뜀: {} (결과 파일 없음)", sheet);
            }
            let path = bridge.sink().workbook_path(&config.sync.spreadsheet_name);
            println!("\n✅ 동기화 완료: {}", path.display());
        }

        Commands::Config { init, show } => {
            if init {
                let path = config.save(cli.config.as_deref())?;
                println!("✔ 설정 파일을 저장했습니다: {}", path.display());
            }

            if show || !init {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
