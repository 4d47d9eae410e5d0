// Application state for HTTP handlers
use crate::application::credential_store::CredentialStore;
use crate::application::display_runtime::DisplayHandle;
use crate::application::status_source::StatusSource;
use crate::infrastructure::connection_tester::ConnectionTester;
use crate::infrastructure::proxy_gateway::ProxyGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub gateway: ProxyGateway,
    pub tester: ConnectionTester,
    pub status_source: Arc<dyn StatusSource>,
    pub display: DisplayHandle,
}
