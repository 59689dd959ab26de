use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use research_core::{RequestId, TimerId};
use research_logging::{research_debug, research_info};

use crate::client::{ClientSettings, ReqwestResearchClient, ResearchClient};
use crate::timer::StepTimers;
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    Execute { request_id: RequestId, query: String },
    ArmTimer { timer_id: TimerId, period: Duration },
    CancelTimer { timer_id: TimerId },
}

/// Receives engine events; implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Front door to the IO side. Commands run on a background tokio runtime;
/// results come back through the `EventSink`.
///
/// Dropping the handle shuts the runtime down, aborting outstanding work.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = ReqwestResearchClient::new(settings)?;
        research_info!("Research endpoint: {}", client.endpoint());
        Self::with_client(Arc::new(client), sink)
    }

    pub fn with_client(
        client: Arc<dyn ResearchClient>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut timers = StepTimers::new(runtime.handle().clone(), sink.clone());
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Execute { request_id, query } => {
                        let client = client.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let result = client.execute(&query).await;
                            research_debug!(
                                "Request {} settled ok={}",
                                request_id,
                                result.is_ok()
                            );
                            sink.emit(EngineEvent::ResearchCompleted { request_id, result });
                        });
                    }
                    EngineCommand::ArmTimer { timer_id, period } => timers.arm(timer_id, period),
                    EngineCommand::CancelTimer { timer_id } => timers.cancel(timer_id),
                }
            }
            drop(timers);
            research_debug!("Engine command channel closed; shutting down");
        });

        Ok(Self { cmd_tx })
    }

    pub fn execute(&self, request_id: RequestId, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Execute {
            request_id,
            query: query.into(),
        });
    }

    pub fn arm_timer(&self, timer_id: TimerId, period: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ArmTimer { timer_id, period });
    }

    pub fn cancel_timer(&self, timer_id: TimerId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelTimer { timer_id });
    }
}
