pub mod cookie;
pub mod dialog;
pub mod dom;
pub mod navigation;

pub use cookie::{Cookie, CookieJar, CookieStore};
pub use dialog::{AttributeRow, Dialog, DialogBody, DialogButton, DialogKind, DialogResponse};
pub use navigation::{Action, FormSubmission, HttpNavigator, Navigator, RecordingNavigator, Routes};
