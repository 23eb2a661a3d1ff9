use std::collections::HashMap;
use std::sync::Mutex;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A cookie as stored by the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Expiry instant
    pub expires: DateTime<Utc>,
}

impl Cookie {
    /// Create a cookie that expires `ttl` from now
    pub fn new(name: impl Into<String>, value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: Utc::now() + ttl,
        }
    }

    /// Whether the cookie has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// `name=value` pair as sent in a `Cookie` header
    pub fn header_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Cookie persistence of the hosting browser
pub trait CookieStore: Send + Sync {
    /// Store or replace a cookie
    fn set(&self, cookie: Cookie);

    /// Look up a live cookie by name
    fn get(&self, name: &str) -> Option<Cookie>;

    /// All live cookies, sorted by name
    fn all(&self) -> Vec<Cookie>;

    /// `Cookie` header value for the live cookies, `None` when there are none
    fn header(&self) -> Option<String> {
        let cookies = self.all();
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(Cookie::header_pair)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// In-memory cookie store
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Mutex<HashMap<String, Cookie>>,
}

impl CookieJar {
    /// Create an empty jar
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for CookieJar {
    fn set(&self, cookie: Cookie) {
        self.cookies.lock().unwrap().insert(cookie.name.clone(), cookie);
    }

    fn get(&self, name: &str) -> Option<Cookie> {
        let now = Utc::now();
        self.cookies
            .lock()
            .unwrap()
            .get(name)
            .filter(|cookie| !cookie.is_expired_at(now))
            .cloned()
    }

    fn all(&self) -> Vec<Cookie> {
        let now = Utc::now();
        let mut cookies: Vec<Cookie> = self
            .cookies
            .lock()
            .unwrap()
            .values()
            .filter(|cookie| !cookie.is_expired_at(now))
            .cloned()
            .collect();
        cookies.sort_by(|a, b| a.name.cmp(&b.name));
        cookies
    }
}
