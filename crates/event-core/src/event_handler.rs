//! Event Handler 定义

use std::sync::Arc;

use async_trait::async_trait;
use tasker_errors::AppResult;

use crate::DomainEvent;

/// Event Handler trait
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, event: &E) -> AppResult<()>;
}

/// 顺序事件中继
///
/// 按注册顺序依次调用处理器，任一失败立即返回，后续处理器不再执行。
pub struct EventRelay<E: DomainEvent> {
    handlers: Vec<Arc<dyn EventHandler<E>>>,
}

impl<E: DomainEvent> EventRelay<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn then(mut self, handler: Arc<dyn EventHandler<E>>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub async fn publish(&self, event: &E) -> AppResult<()> {
        for (index, handler) in self.handlers.iter().enumerate() {
            if let Err(e) = handler.handle(event).await {
                tracing::error!(
                    event_type = event.event_type(),
                    aggregate_id = %event.aggregate_id(),
                    stage = index,
                    error = %e,
                    "Event handler failed, remaining handlers skipped"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

impl<E: DomainEvent> Default for EventRelay<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};
    use serde::Serialize;
    use tasker_errors::AppError;

    use super::*;

    #[derive(Serialize)]
    struct Pinged;

    impl DomainEvent for Pinged {
        fn event_type(&self) -> &'static str {
            "Pinged"
        }

        fn aggregate_type(&self) -> &'static str {
            "Test"
        }

        fn aggregate_id(&self) -> String {
            "1".to_string()
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    struct Recorder {
        name: &'static str,
        fail: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl EventHandler<Pinged> for Recorder {
        async fn handle(&self, _event: &Pinged) -> AppResult<()> {
            if self.fail {
                return Err(AppError::internal("sink down"));
            }
            self.log.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    fn recorder(name: &'static str, fail: bool, log: &Arc<Mutex<Vec<&'static str>>>) -> Arc<Recorder> {
        Arc::new(Recorder {
            name,
            fail,
            log: log.clone(),
        })
    }

    #[tokio::test]
    async fn test_handlers_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let relay = EventRelay::new()
            .then(recorder("first", false, &log))
            .then(recorder("second", false, &log));

        relay.publish(&Pinged).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failure_stops_the_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let relay = EventRelay::new()
            .then(recorder("first", true, &log))
            .then(recorder("second", false, &log));

        assert!(relay.publish(&Pinged).await.is_err());
        assert!(log.lock().unwrap().is_empty());
    }
}
