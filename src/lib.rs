//! Dashboard signage: a framing-friendly proxy for third-party dashboards, a
//! connection tester and the rotation controller that drives a kiosk display.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
