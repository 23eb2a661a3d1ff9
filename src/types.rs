use std::fmt;
use serde::{Serialize, Deserialize};

/// Project-wide Result type
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Qualifier naming the CA environment a request pertains to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instance(String);

impl Instance {
    /// Create a new instance qualifier
    pub fn new(name: impl Into<String>) -> Self {
        Instance(name.into())
    }

    /// Instance name as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Instance {
    fn from(name: &str) -> Self {
        Instance::new(name)
    }
}

impl From<String> for Instance {
    fn from(name: String) -> Self {
        Instance(name)
    }
}

/// Certificate the revoke button is currently bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeTarget {
    /// Serial number of the certificate
    pub serial_number: String,
    /// Instance the certificate belongs to
    pub instance: Instance,
}

/// Visibility of a page element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Element is displayed
    Shown,
    /// Element is hidden
    Hidden,
}

impl Visibility {
    /// Map a boolean onto a visibility
    pub fn from_shown(shown: bool) -> Self {
        if shown {
            Visibility::Shown
        } else {
            Visibility::Hidden
        }
    }

    /// Whether the element is displayed
    pub fn is_shown(self) -> bool {
        self == Visibility::Shown
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Hidden
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Shown => write!(f, "shown"),
            Visibility::Hidden => write!(f, "hidden"),
        }
    }
}
