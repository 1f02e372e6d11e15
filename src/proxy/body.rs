use axum::body::{Body, Bytes};

use crate::errors::AppError;

/// Inbound request body that can be read exactly once.
///
/// `read` takes `self`, so a second read does not compile. The returned
/// `Bytes` are reference counted; clone them when more than one consumer
/// needs the payload.
pub struct InboundBody(Body);

impl InboundBody {
    pub fn new(body: Body) -> Self {
        Self(body)
    }

    pub async fn read(self, limit: usize) -> Result<Bytes, AppError> {
        axum::body::to_bytes(self.0, limit)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to read request body: {}", e)))
    }
}

impl From<Body> for InboundBody {
    fn from(body: Body) -> Self {
        Self::new(body)
    }
}
