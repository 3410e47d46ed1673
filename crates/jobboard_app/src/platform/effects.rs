use board_logging::{board_debug, board_info, board_warn};
use chrono::Local;
use jobboard_core::{Effect, Item, ItemId, Msg};
use jobboard_engine::{EngineError, EngineEvent, EngineHandle, FetchSettings, ListingRecord};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartFetch { generation, url } => {
                    board_info!("StartFetch generation={} url={}", generation, url);
                    self.engine.start(generation, url);
                }
                Effect::CancelFetch { generation } => {
                    board_info!("CancelFetch generation={}", generation);
                    self.engine.cancel(generation);
                }
            }
        }
    }

    /// Everything the engine reported since the last call, as messages.
    pub fn drain(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_event(event));
        }
        msgs
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::FetchProgress {
            generation: progress.generation,
            bytes: progress.bytes,
        },
        EngineEvent::FetchCompleted { generation, result } => match result {
            Ok(records) => Msg::FetchSucceeded {
                generation,
                items: records.into_iter().map(to_item).collect(),
                fetched_at: Local::now().format("%H:%M:%S").to_string(),
            },
            Err(err) if err.is_cancelled() => {
                board_debug!("Generation {} cancelled in engine", generation);
                Msg::FetchCancelled { generation }
            }
            Err(err) => {
                board_warn!("Generation {} failed: {}", generation, err);
                Msg::FetchFailed {
                    generation,
                    detail: err.to_string(),
                }
            }
        },
    }
}

fn to_item(record: ListingRecord) -> Item {
    Item {
        id: ItemId::new(record.id),
        title: record.title,
        company: record.company,
        location: record.location,
        description: record.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_engine::{FailureKind, FetchError, FetchProgress};

    #[test]
    fn successful_fetch_becomes_items() {
        let record = ListingRecord {
            id: "src-1".into(),
            source_id: Some("1".into()),
            title: "Cook".into(),
            company: "Diner".into(),
            location: "NY".into(),
            description: "Grill".into(),
        };
        let msg = map_event(EngineEvent::FetchCompleted {
            generation: 3,
            result: Ok(vec![record]),
        });

        match msg {
            Msg::FetchSucceeded {
                generation, items, ..
            } => {
                assert_eq!(generation, 3);
                assert_eq!(
                    items,
                    vec![Item::new("src-1", "Cook", "Diner", "NY").with_description("Grill")]
                );
            }
            other => panic!("unexpected msg {other:?}"),
        }
    }

    #[test]
    fn cancellation_is_not_a_failure() {
        let msg = map_event(EngineEvent::FetchCompleted {
            generation: 2,
            result: Err(FetchError {
                kind: FailureKind::Cancelled,
                message: "request abandoned".into(),
            }),
        });
        assert_eq!(msg, Msg::FetchCancelled { generation: 2 });
    }

    #[test]
    fn transport_failure_carries_detail() {
        let msg = map_event(EngineEvent::FetchCompleted {
            generation: 4,
            result: Err(FetchError {
                kind: FailureKind::HttpStatus(503),
                message: "503 Service Unavailable".into(),
            }),
        });
        assert_eq!(
            msg,
            Msg::FetchFailed {
                generation: 4,
                detail: "http status 503: 503 Service Unavailable".into(),
            }
        );
    }

    #[test]
    fn progress_is_forwarded() {
        let msg = map_event(EngineEvent::Progress(FetchProgress {
            generation: 1,
            bytes: 99,
        }));
        assert_eq!(
            msg,
            Msg::FetchProgress {
                generation: 1,
                bytes: 99
            }
        );
    }
}
