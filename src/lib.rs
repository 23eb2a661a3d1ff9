//! CA Admin Console - headless interaction layer of a certificate authority console
//!
//! Certificate detail overlays, request attribute parsing and the revoke, issue
//! and list filter confirmations, modelled as view-models over an async API.

// Foundational layer
pub mod error;
pub mod types;
pub mod config;
pub mod telemetry;

// Core layer
pub mod ca;
pub mod interface;

// Application layer
pub mod controller;
pub mod console;

// Public key types
pub use crate::error::Error;
pub use crate::types::{Instance, Result, RevokeTarget, Visibility};
pub use crate::ca::{ConsoleApi, HttpConsoleApi, ParseStatus, ParsedRequestAttributes};
pub use crate::console::AdminConsole;
pub use crate::interface::{Action, Dialog, DialogResponse, Navigator};
pub use crate::telemetry::ConsoleMetrics;
