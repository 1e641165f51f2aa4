use crate::domain::model::{RawResponse, RequestDescriptor};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 傳送請求描述並回傳原始回應的 HTTP 傳輸層
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse>;
}

/// 在每次呼叫時讀取目前的 session token（唯讀）
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}
