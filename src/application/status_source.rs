// Status source trait for status-page aggregation
use crate::domain::dashboard::Credentials;
use crate::domain::status::StatusReport;
use async_trait::async_trait;

#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch and normalize the monitors behind `base_url`. Failures are
    /// encoded in the report rather than returned.
    async fn fetch_status(&self, base_url: &str, credentials: Option<&Credentials>) -> StatusReport;
}
