// Domain layer - Core types with no I/O
pub mod dashboard;
pub mod embed;
pub mod proxy;
pub mod settings;
pub mod status;
