// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod connection_tester;
pub mod header_policy;
pub mod http_client;
pub mod http_response;
pub mod json_store;
pub mod proxy_gateway;
pub mod uptimekuma_source;
