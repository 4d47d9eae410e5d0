// Application layer - Use cases and the display state machine
pub mod credential_store;
pub mod display_runtime;
pub mod display_shell;
pub mod rotation;
pub mod status_source;
pub mod timer;
