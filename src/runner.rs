//! 세션 부수 효과 실행
//!
//! 상태 머신이 돌려준 `Effect` 를 순서대로 결과 파일과 동기화 대상에 반영한다.

use crate::config::{Config, PresenceMode};
use crate::error::Result;
use crate::ledger::{KeyedLedger, Ledger};
use crate::session::Effect;
use crate::sync::{SheetSink, SyncBridge, SyncReport, SyncTarget};
use patho_eval_common::{BlindRecord, PresenceRecord, SimilarityRecord};
use tracing::debug;

pub struct Ledgers {
    pub similarity: Ledger<SimilarityRecord>,
    pub blind: Ledger<BlindRecord>,
    pub presence: Ledger<PresenceRecord>,
    /// 배치 모드일 때만 연다
    pub presence_keyed: Option<KeyedLedger<PresenceRecord>>,
}

impl Ledgers {
    pub fn open(config: &Config) -> Result<Self> {
        let presence_keyed = match config.presence_mode {
            PresenceMode::Batched => Some(KeyedLedger::open(config.presence_ledger())?),
            PresenceMode::Single => None,
        };
        Ok(Self {
            similarity: Ledger::new(config.similarity_ledger()),
            blind: Ledger::new(config.blind_ledger()),
            presence: Ledger::new(config.presence_ledger()),
            presence_keyed,
        })
    }
}

/// 실험 1, 2 결과 파일 → 워크시트
pub fn sync_targets(config: &Config) -> Vec<SyncTarget> {
    vec![
        SyncTarget {
            csv_path: config.similarity_ledger(),
            worksheet: config.sync.similarity_worksheet.clone(),
        },
        SyncTarget {
            csv_path: config.blind_ledger(),
            worksheet: config.sync.blind_worksheet.clone(),
        },
    ]
}

pub struct EffectRunner<S> {
    ledgers: Ledgers,
    bridge: SyncBridge<S>,
    last_sync: Option<SyncReport>,
}

impl<S: SheetSink> EffectRunner<S> {
    pub fn new(ledgers: Ledgers, bridge: SyncBridge<S>) -> Self {
        Self {
            ledgers,
            bridge,
            last_sync: None,
        }
    }

    pub fn ledgers(&self) -> &Ledgers {
        &self.ledgers
    }

    pub fn last_sync(&self) -> Option<&SyncReport> {
        self.last_sync.as_ref()
    }

    pub fn bridge(&self) -> &SyncBridge<S> {
        &self.bridge
    }

    /// 효과를 순서대로 실행. 첫 실패에서 멈춘다.
    pub fn run(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::AppendSimilarity(record) => self.ledgers.similarity.append(&record)?,
                Effect::AppendBlind(record) => self.ledgers.blind.append(&record)?,
                Effect::AppendPresence(record) => self.ledgers.presence.append(&record)?,
                Effect::UpsertPresence(records) => {
                    debug!(rows = records.len(), "upserting presence batch");
                    if self.ledgers.presence_keyed.is_none() {
                        let store = KeyedLedger::open(self.ledgers.presence.path())?;
                        self.ledgers.presence_keyed = Some(store);
                    }
                    if let Some(store) = self.ledgers.presence_keyed.as_mut() {
                        store.upsert_all(records)?;
                        debug!(total = store.len(), "presence ledger rewritten");
                    }
                }
                Effect::SyncLedgers => {
                    let report = self.bridge.sync_all()?;
                    self.last_sync = Some(report);
                }
            }
        }
        Ok(())
    }
}
