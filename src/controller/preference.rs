use std::sync::{Arc, Mutex};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::interface::cookie::{Cookie, CookieStore};
use crate::interface::navigation::{Action, Routes};
use crate::types::{Instance, Result};

/// Cookie holding the "only valid certificates" preference
pub const JUST_VALID_CERTS_COOKIE: &str = "justValidCerts";
/// Lifetime of the preference cookie
pub const PREFERENCE_TTL_DAYS: i64 = 200;

/// State of the "show only valid certificates" checkbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceView {
    pub just_valid_certs: bool,
}

/// Persists the certificate list filter and reloads the listing
pub struct PreferenceToggle {
    routes: Routes,
    cookies: Arc<dyn CookieStore>,
    view: Mutex<PreferenceView>,
}

impl PreferenceToggle {
    /// Checkbox initialised from the stored preference
    pub fn new(routes: Routes, cookies: Arc<dyn CookieStore>) -> Self {
        let just_valid_certs = stored_preference(cookies.as_ref()).unwrap_or(false);
        Self {
            routes,
            cookies,
            view: Mutex::new(PreferenceView { just_valid_certs }),
        }
    }

    pub fn view(&self) -> PreferenceView {
        *self.view.lock().unwrap()
    }

    /// Tick or untick the checkbox
    pub fn set_checked(&self, checked: bool) {
        self.view.lock().unwrap().just_valid_certs = checked;
    }

    /// Store the checkbox state and return the reload of the admin listing
    pub fn apply_valid_certs_filter(&self, instance: &Instance) -> Result<Action> {
        let checked = self.view().just_valid_certs;
        self.cookies.set(Cookie::new(
            JUST_VALID_CERTS_COOKIE,
            checked.to_string(),
            Duration::days(PREFERENCE_TTL_DAYS),
        ));
        info!("Stored {}={}, reloading admin listing of {}", JUST_VALID_CERTS_COOKIE, checked, instance);

        Ok(Action::Navigate(self.routes.admin(instance)?))
    }
}

/// Preference as stored in the cookie store
pub fn stored_preference(cookies: &dyn CookieStore) -> Option<bool> {
    cookies
        .get(JUST_VALID_CERTS_COOKIE)
        .and_then(|cookie| cookie.value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::cookie::CookieJar;
    use chrono::Utc;
    use url::Url;

    fn toggle(jar: Arc<CookieJar>) -> PreferenceToggle {
        let routes = Routes::new(Url::parse("https://ca.example.com/ca/").unwrap(), "request");
        PreferenceToggle::new(routes, jar)
    }

    #[test]
    fn test_cookie_follows_checkbox() {
        let jar = Arc::new(CookieJar::new());
        let toggle = toggle(jar.clone());
        assert!(!toggle.view().just_valid_certs);

        for checked in [true, false] {
            toggle.set_checked(checked);
            let action = toggle.apply_valid_certs_filter(&Instance::new("rsa")).unwrap();

            let cookie = jar.get(JUST_VALID_CERTS_COOKIE).unwrap();
            assert_eq!(cookie.value, checked.to_string());
            assert_eq!(stored_preference(jar.as_ref()), Some(checked));
            assert_eq!(
                action,
                Action::Navigate(Url::parse("https://ca.example.com/ca/admin?instance=rsa").unwrap())
            );
        }
    }

    #[test]
    fn test_cookie_lifetime() {
        let jar = Arc::new(CookieJar::new());
        let toggle = toggle(jar.clone());
        toggle.set_checked(true);
        toggle.apply_valid_certs_filter(&Instance::new("rsa")).unwrap();

        let expires = jar.get(JUST_VALID_CERTS_COOKIE).unwrap().expires;
        let days = (expires - Utc::now()).num_days();
        assert!((199..=200).contains(&days));
    }

    #[test]
    fn test_checkbox_restored_from_cookie() {
        let jar = Arc::new(CookieJar::new());
        jar.set(Cookie::new(JUST_VALID_CERTS_COOKIE, "true", Duration::days(10)));
        assert!(toggle(jar).view().just_valid_certs);
    }
}
