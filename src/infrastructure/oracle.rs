use crate::domain::config::RandomnessParams;
use crate::domain::ports::RandomnessSource;
use crate::domain::raffle::RequestId;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stand-in randomness coordinator.
///
/// Hands out monotonically increasing request identifiers and records the
/// parameters of every request. Fulfillment is driven by the caller (tests or
/// the simulation driver) through the engine's own callback entry point, which
/// mirrors how a real coordinator answers at a time of its choosing.
#[derive(Default, Clone)]
pub struct MockRandomnessCoordinator {
    inner: Arc<RwLock<CoordinatorInner>>,
}

#[derive(Default)]
struct CoordinatorInner {
    next_id: u64,
    requests: Vec<(RequestId, RandomnessParams)>,
}

impl MockRandomnessCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the most recently issued request.
    pub async fn last_request(&self) -> Option<RequestId> {
        let inner = self.inner.read().await;
        inner.requests.last().map(|(id, _)| *id)
    }

    /// Every request issued so far, in order.
    pub async fn requests(&self) -> Vec<(RequestId, RandomnessParams)> {
        self.inner.read().await.requests.clone()
    }
}

#[async_trait]
impl RandomnessSource for MockRandomnessCoordinator {
    async fn request_randomness(&self, params: &RandomnessParams) -> Result<RequestId> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = RequestId(inner.next_id);
        inner.requests.push((id, *params));
        Ok(id)
    }
}
