use std::sync::{Arc, Mutex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ca::provider::ConsoleApi;
use crate::ca::types::CertDetailPayload;
use crate::error::Error;
use crate::telemetry::ConsoleMetrics;
use crate::types::{Instance, Result, RevokeTarget, Visibility};

/// Body shown when the server has nothing for the requested certificate
pub const NO_DATA_AVAILABLE: &str = "No data available";

/// Window chrome subtracted before sizing the overlay body
const OVERLAY_CHROME_HEIGHT: u64 = 115;
const MIN_OVERLAY_HEIGHT: u64 = 100;

/// Height of the scrollable overlay body for a window height
pub fn overlay_display_height(window_height: u32) -> u32 {
    let height = (window_height as u64).saturating_sub(OVERLAY_CHROME_HEIGHT) * 94 / 100;
    height.max(MIN_OVERLAY_HEIGHT) as u32
}

/// Content of the overlay body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayBody {
    /// Nothing loaded yet
    Blank,
    /// Certificate details and PEM
    Detail { cert_html: String, pem: String },
    /// The server returned nothing
    NoData,
}

impl OverlayBody {
    /// Markup rendered into the overlay body
    pub fn html(&self) -> String {
        match self {
            OverlayBody::Blank => String::new(),
            OverlayBody::Detail { cert_html, .. } => cert_html.clone(),
            OverlayBody::NoData => NO_DATA_AVAILABLE.to_string(),
        }
    }
}

/// State of the certificate detail overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayView {
    pub visibility: Visibility,
    /// Height of the scrollable body in pixels
    pub display_height: u32,
    pub body: OverlayBody,
    pub revoke_button: Visibility,
    pub revoked_label: Visibility,
    /// Certificate the revoke button acts on
    pub revoke_target: Option<RevokeTarget>,
}

impl OverlayView {
    /// Hidden overlay sized for the window
    pub fn new(window_height: u32) -> Self {
        Self {
            visibility: Visibility::Hidden,
            display_height: overlay_display_height(window_height),
            body: OverlayBody::Blank,
            revoke_button: Visibility::Hidden,
            revoked_label: Visibility::Hidden,
            revoke_target: None,
        }
    }

    fn render_detail(&mut self, payload: CertDetailPayload) {
        self.body = OverlayBody::Detail {
            cert_html: payload.cert_html,
            pem: payload.pem,
        };
    }

    fn render_no_data(&mut self) {
        self.body = OverlayBody::NoData;
        self.revoke_button = Visibility::Hidden;
        self.revoked_label = Visibility::Hidden;
        self.revoke_target = None;
    }
}

/// Controller of the certificate detail overlay
pub struct DetailOverlay {
    api: Arc<dyn ConsoleApi>,
    metrics: Arc<ConsoleMetrics>,
    view: Mutex<OverlayView>,
}

impl DetailOverlay {
    pub fn new(api: Arc<dyn ConsoleApi>, metrics: Arc<ConsoleMetrics>, window_height: u32) -> Self {
        Self {
            api,
            metrics,
            view: Mutex::new(OverlayView::new(window_height)),
        }
    }

    /// Snapshot of the overlay state
    pub fn view(&self) -> OverlayView {
        self.view.lock().unwrap().clone()
    }

    /// Show an issued certificate, offering revocation unless already revoked
    ///
    /// On a transport failure the overlay is left as it was and the error is
    /// returned.
    pub async fn show_certificate(&self, serial_number: &str, revoked: bool, instance: &Instance) -> Result<()> {
        debug!("Loading certificate {} of {}", serial_number, instance);

        let body = self
            .api
            .get_cert_data(serial_number, instance)
            .await
            .map_err(|e| self.transport_failure(e))?;
        let payload = parse_payload(body)?;

        let mut view = self.view.lock().unwrap();
        match payload {
            Some(payload) => {
                view.render_detail(payload);
                // Rebinding replaces the target of any earlier certificate
                view.revoke_target = Some(RevokeTarget {
                    serial_number: serial_number.to_string(),
                    instance: instance.clone(),
                });
                view.revoke_button = Visibility::from_shown(!revoked);
                view.revoked_label = Visibility::from_shown(revoked);
            }
            None => view.render_no_data(),
        }
        view.visibility = Visibility::Shown;
        self.metrics.inc_overlay_loads();

        Ok(())
    }

    /// Show a certificate of the CA chain; chain certificates are never revocable here
    pub async fn show_chain_certificate(&self, idx: usize, instance: &Instance) -> Result<()> {
        debug!("Loading chain certificate {} of {}", idx, instance);

        let body = self
            .api
            .get_chain_cert_data(idx, instance)
            .await
            .map_err(|e| self.transport_failure(e))?;
        let payload = parse_payload(body)?;

        let mut view = self.view.lock().unwrap();
        match payload {
            Some(payload) => {
                view.render_detail(payload);
                view.revoke_target = None;
                view.revoke_button = Visibility::Hidden;
                view.revoked_label = Visibility::Hidden;
            }
            None => view.render_no_data(),
        }
        view.visibility = Visibility::Shown;
        self.metrics.inc_overlay_loads();

        Ok(())
    }

    /// Hide the overlay
    pub fn close(&self) {
        self.view.lock().unwrap().visibility = Visibility::Hidden;
    }

    /// Press the revoke button, yielding the bound certificate when the button is offered
    pub fn click_revoke(&self) -> Option<RevokeTarget> {
        let view = self.view.lock().unwrap();
        if view.visibility.is_shown() && view.revoke_button.is_shown() {
            view.revoke_target.clone()
        } else {
            None
        }
    }

    fn transport_failure(&self, err: Error) -> Error {
        warn!("Certificate detail request failed: {}", err);
        self.metrics.inc_transport_failures();
        err
    }
}

fn parse_payload(body: Option<String>) -> Result<Option<CertDetailPayload>> {
    match body {
        Some(body) => {
            let payload = serde_json::from_str(&body)
                .map_err(|e| Error::Serialization(format!("Invalid certificate data: {}", e)))?;
            Ok(Some(payload))
        }
        None => Ok(None),
    }
}
