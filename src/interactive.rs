//! 대화식 평가 세션 (터미널)
//!
//! 상태 머신 위에 얹은 얇은 표현 계층. 이미지는 경로만 보여준다.
//!
//! ## 변경 이력
//! - 유무 판정 배치 모드: 이전 배치로 돌아가 응답 수정 가능

use crate::error::{PathoEvalError, Result};
use crate::runner::EffectRunner;
use crate::session::{render, PresenceView, SessionState, TrackView, UserAction};
use crate::sync::SheetSink;
use dialoguer::{Input, Select};
use patho_eval_common::{Prediction, Presence, Score};

const BACK_TO_MENU: &str = "↩ 메뉴로";

fn prompt_err(e: dialoguer::Error) -> PathoEvalError {
    PathoEvalError::Prompt(e.to_string())
}

fn select(prompt: &str, items: &[String], default: usize) -> Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()
        .map_err(prompt_err)
}

fn input(prompt: &str, initial: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)
}

/// 동작 적용 → 효과 실행. 거부된 동작은 경고만 출력하고 상태를 유지한다.
fn dispatch<S: SheetSink>(
    state: SessionState,
    runner: &mut EffectRunner<S>,
    action: UserAction,
) -> Result<SessionState> {
    match state.apply(action) {
        Ok(transition) => {
            let synced = transition.state.is_synced() && !state.is_synced();
            runner.run(transition.effects)?;
            if synced {
                if let Some(report) = runner.last_sync() {
                    println!("✔ 스프레드시트 동기화: {}", report.uploaded.join(", "));
                }
            }
            Ok(transition.state)
        }
        Err(e) => {
            println!("⚠ {}", e);
            Ok(state)
        }
    }
}

fn progress<T>(view: &TrackView<T>) -> String {
    match view {
        TrackView::Pending { position, total, .. } => format!("{}/{}", position, total),
        TrackView::Complete => "완료".into(),
    }
}

/// 대화식 세션 실행. 종료 시점의 상태를 돌려준다.
pub fn run_session<S: SheetSink>(
    mut state: SessionState,
    runner: &mut EffectRunner<S>,
    name: Option<String>,
    affiliation: Option<String>,
) -> Result<SessionState> {
    // 평가자 정보 (둘 다 입력될 때까지 진행하지 않음)
    let (mut name, mut affiliation) = (name.unwrap_or_default(), affiliation.unwrap_or_default());
    while state.identity().is_none() {
        if name.trim().is_empty() || affiliation.trim().is_empty() {
            name = input("이름을 입력해주세요", &name)?;
            affiliation = input("소속을 입력해주세요", &affiliation)?;
        }
        state = dispatch(
            state,
            runner,
            UserAction::SetIdentity {
                name: name.clone(),
                affiliation: affiliation.clone(),
            },
        )?;
        name.clear();
        affiliation.clear();
    }

    println!("\n🔬 병리학자 정성 평가\n");

    loop {
        let view = render(&state);
        let presence_progress = match &view.presence {
            PresenceView::Single(t) => progress(t),
            PresenceView::Batch { batch_number, total_batches, .. } => {
                format!("배치 {}/{}", batch_number, total_batches)
            }
            PresenceView::BatchComplete => "완료".into(),
        };
        let menu = vec![
            format!("실험 1: 5점 척도 + 코멘트 ({})", progress(&view.similarity)),
            format!("실험 2: 블라인드 테스트 ({})", progress(&view.blind)),
            format!("유무 판정 ({})", presence_progress),
            "종료".to_string(),
        ];

        state = match select("평가 항목", &menu, 0)? {
            0 => similarity_loop(state, runner)?,
            1 => blind_loop(state, runner)?,
            2 => presence_loop(state, runner)?,
            _ => break,
        };
    }

    Ok(state)
}

fn similarity_loop<S: SheetSink>(
    mut state: SessionState,
    runner: &mut EffectRunner<S>,
) -> Result<SessionState> {
    loop {
        let TrackView::Pending { position, total, item } = render(&state).similarity else {
            println!("✔ 실험 1 평가가 완료되었습니다.");
            return Ok(state);
        };

        println!("\n[{}/{}]", position, total);
        println!("  실제 이미지: {}", item.real_path);
        println!("  가상 이미지: {}", item.virtual_path);

        let mut options: Vec<String> = Score::all().map(|s| s.to_string()).collect();
        options.push(BACK_TO_MENU.to_string());
        let choice = select("유사성 점수 (1=전혀 유사하지 않음, 5=매우 유사함)", &options, 0)?;
        let Some(score) = Score::all().nth(choice) else {
            return Ok(state);
        };
        let comment = input("판단 근거 또는 코멘트 (선택 사항)", "")?;

        state = dispatch(state, runner, UserAction::SubmitSimilarity { score, comment })?;
    }
}

fn blind_loop<S: SheetSink>(
    mut state: SessionState,
    runner: &mut EffectRunner<S>,
) -> Result<SessionState> {
    loop {
        let TrackView::Pending { position, total, item } = render(&state).blind else {
            println!("✔ 실험 2 평가가 완료되었습니다.");
            return Ok(state);
        };

        println!("\n[{}/{}] {}", position, total, item);

        let mut options: Vec<String> = Prediction::OPTIONS.iter().map(|p| p.to_string()).collect();
        options.push(BACK_TO_MENU.to_string());
        // 항상 첫 번째 선택지에서 시작
        let choice = select("이 이미지의 정체는?", &options, 0)?;
        let Some(&prediction) = Prediction::OPTIONS.get(choice) else {
            return Ok(state);
        };

        state = dispatch(state, runner, UserAction::SubmitBlind { prediction })?;
    }
}

fn presence_loop<S: SheetSink>(
    mut state: SessionState,
    runner: &mut EffectRunner<S>,
) -> Result<SessionState> {
    loop {
        match render(&state).presence {
            PresenceView::Single(TrackView::Pending { position, total, item }) => {
                println!("\n[{}/{}] {}", position, total, item);
                let mut options: Vec<String> =
                    Presence::OPTIONS.iter().map(|p| p.to_string()).collect();
                options.push(BACK_TO_MENU.to_string());
                let choice = select("사구체가 있습니까?", &options, 0)?;
                let Some(&answer) = Presence::OPTIONS.get(choice) else {
                    return Ok(state);
                };
                state = dispatch(state, runner, UserAction::SubmitPresence { answer })?;
            }
            PresenceView::Batch { batch_number, total_batches, items, can_go_back } => {
                println!("\n배치 {}/{}", batch_number, total_batches);

                let mut options: Vec<String> = items
                    .iter()
                    .map(|i| format!("{:>3}. {} [{}]", i.index + 1, i.image_path, i.answer))
                    .collect();
                let first_extra = options.len();
                if can_go_back {
                    options.push("◀ 이전 배치".to_string());
                }
                options.push("제출 후 다음 배치 ▶".to_string());
                options.push(BACK_TO_MENU.to_string());

                let choice = select("응답을 바꿀 이미지를 고르세요", &options, first_extra)?;
                if let Some(item) = items.get(choice) {
                    let default = Presence::OPTIONS
                        .iter()
                        .position(|p| *p == item.answer)
                        .unwrap_or(0);
                    let labels: Vec<String> =
                        Presence::OPTIONS.iter().map(|p| p.to_string()).collect();
                    let picked = select(&item.image_path, &labels, default)?;
                    let answer = Presence::OPTIONS.get(picked).copied().unwrap_or_default();
                    state = dispatch(
                        state,
                        runner,
                        UserAction::ChoosePresence { index: item.index, answer },
                    )?;
                    continue;
                }

                let action = match (choice - first_extra, can_go_back) {
                    (0, true) => UserAction::PreviousBatch,
                    (0, false) | (1, true) => UserAction::NextBatch,
                    _ => return Ok(state),
                };
                state = dispatch(state, runner, action)?;
            }
            PresenceView::Single(TrackView::Complete) | PresenceView::BatchComplete => {
                println!("✔ 유무 판정 평가가 완료되었습니다.");
                return Ok(state);
            }
        }
    }
}
