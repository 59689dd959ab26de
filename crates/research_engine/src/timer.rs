use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use research_core::TimerId;
use research_logging::{research_debug, research_trace};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::{EngineEvent, EventSink};

/// Repeating step timers, each a tokio task keyed by its `TimerId`.
pub(crate) struct StepTimers {
    runtime: Handle,
    sink: Arc<dyn EventSink>,
    active: HashMap<TimerId, JoinHandle<()>>,
}

impl StepTimers {
    pub(crate) fn new(runtime: Handle, sink: Arc<dyn EventSink>) -> Self {
        Self {
            runtime,
            sink,
            active: HashMap::new(),
        }
    }

    /// Starts firing `StepTimerFired { timer_id }` every `period`, first
    /// firing one period from now. Re-arming an id replaces its task.
    pub(crate) fn arm(&mut self, timer_id: TimerId, period: Duration) {
        self.cancel(timer_id);
        let sink = self.sink.clone();
        let task = self.runtime.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                research_trace!("Step timer {} fired", timer_id);
                sink.emit(EngineEvent::StepTimerFired { timer_id });
            }
        });
        research_debug!("Armed step timer {} period={:?}", timer_id, period);
        self.active.insert(timer_id, task);
    }

    /// Aborts the timer task; unknown ids are ignored.
    pub(crate) fn cancel(&mut self, timer_id: TimerId) {
        if let Some(task) = self.active.remove(&timer_id) {
            task.abort();
            research_debug!("Cancelled step timer {}", timer_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl Drop for StepTimers {
    fn drop(&mut self) {
        for (_, task) in self.active.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use super::StepTimers;
    use crate::{ChannelEventSink, EngineEvent};

    fn timers() -> (tokio::runtime::Runtime, StepTimers, mpsc::Receiver<EngineEvent>) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let timers = StepTimers::new(
            runtime.handle().clone(),
            Arc::new(ChannelEventSink::new(tx)),
        );
        (runtime, timers, rx)
    }

    #[test]
    fn armed_timer_fires_repeatedly() {
        let (_runtime, mut timers, rx) = timers();
        timers.arm(7, Duration::from_millis(10));

        for _ in 0..3 {
            let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(event, EngineEvent::StepTimerFired { timer_id: 7 });
        }
    }

    #[test]
    fn cancelled_timer_goes_quiet() {
        let (_runtime, mut timers, rx) = timers();
        timers.arm(1, Duration::from_millis(10));
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        timers.cancel(1);
        assert_eq!(timers.active_count(), 0);
        // Drain anything emitted before the abort landed.
        std::thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(60)).is_err());
    }

    #[test]
    fn cancel_unknown_timer_is_noop() {
        let (_runtime, mut timers, _rx) = timers();
        timers.cancel(42);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn rearming_same_id_keeps_one_task() {
        let (_runtime, mut timers, _rx) = timers();
        timers.arm(3, Duration::from_secs(60));
        timers.arm(3, Duration::from_secs(60));
        assert_eq!(timers.active_count(), 1);
    }
}
