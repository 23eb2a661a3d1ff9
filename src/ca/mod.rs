pub mod types;
pub mod provider;
pub mod client;
pub mod mock;

// Re-export key types
pub use types::{CertDetailPayload, ParseStatus, ParsedRequestAttributes, EMPTY_INPUT_SENTINEL};
pub use provider::{ConsoleApi, create_console_api};
pub use client::HttpConsoleApi;
pub use mock::{ScriptedConsoleApi, ScriptedResponse};
