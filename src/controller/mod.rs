pub mod form;
pub mod overlay;
pub mod assistant;
pub mod revoke;
pub mod preference;
pub mod submission;

pub use form::{RequestField, RequestFields, RequestFormView};
pub use overlay::{DetailOverlay, OverlayBody, OverlayView};
pub use assistant::{ApplyOutcome, RequestAttributeAssistant};
pub use revoke::RevokeFlow;
pub use preference::{PreferenceToggle, PreferenceView};
pub use submission::SubmissionConfirmation;
