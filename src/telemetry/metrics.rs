use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

use crate::error::Error;
use crate::types::Result;

/// Counters for the console flows
pub struct ConsoleMetrics {
    /// Registry
    registry: Registry,
    /// Parse requests sent to the server
    parse_requests: IntCounter,
    /// Parse responses dropped because a newer request was issued
    stale_responses: IntCounter,
    /// Requests that never produced a usable response
    transport_failures: IntCounter,
    /// Detail overlays rendered
    overlay_loads: IntCounter,
    /// Dialogs confirmed by the admin
    confirmed_dialogs: IntCounter,
}

impl ConsoleMetrics {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let parse_requests = IntCounter::with_opts(Opts::new(
            "console_parse_requests_total",
            "Number of certificate request parse calls issued",
        ))?;
        let stale_responses = IntCounter::with_opts(Opts::new(
            "console_stale_parse_responses_total",
            "Number of parse responses discarded as superseded",
        ))?;
        let transport_failures = IntCounter::with_opts(Opts::new(
            "console_transport_failures_total",
            "Number of requests that failed at the transport level",
        ))?;
        let overlay_loads = IntCounter::with_opts(Opts::new(
            "console_overlay_loads_total",
            "Number of certificate detail overlays rendered",
        ))?;
        let confirmed_dialogs = IntCounter::with_opts(Opts::new(
            "console_confirmed_dialogs_total",
            "Number of confirmation dialogs accepted",
        ))?;

        registry.register(Box::new(parse_requests.clone()))?;
        registry.register(Box::new(stale_responses.clone()))?;
        registry.register(Box::new(transport_failures.clone()))?;
        registry.register(Box::new(overlay_loads.clone()))?;
        registry.register(Box::new(confirmed_dialogs.clone()))?;

        Ok(Self {
            registry,
            parse_requests,
            stale_responses,
            transport_failures,
            overlay_loads,
            confirmed_dialogs,
        })
    }

    /// Increment parse requests
    pub fn inc_parse_requests(&self) {
        self.parse_requests.inc();
    }

    /// Increment stale responses
    pub fn inc_stale_responses(&self) {
        self.stale_responses.inc();
    }

    /// Increment transport failures
    pub fn inc_transport_failures(&self) {
        self.transport_failures.inc();
    }

    /// Increment overlay loads
    pub fn inc_overlay_loads(&self) {
        self.overlay_loads.inc();
    }

    /// Increment confirmed dialogs
    pub fn inc_confirmed_dialogs(&self) {
        self.confirmed_dialogs.inc();
    }

    pub fn parse_requests(&self) -> u64 {
        self.parse_requests.get()
    }

    pub fn stale_responses(&self) -> u64 {
        self.stale_responses.get()
    }

    pub fn transport_failures(&self) -> u64 {
        self.transport_failures.get()
    }

    pub fn overlay_loads(&self) -> u64 {
        self.overlay_loads.get()
    }

    pub fn confirmed_dialogs(&self) -> u64 {
        self.confirmed_dialogs.get()
    }

    /// Render all counters in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Metrics(e.to_string()))
    }
}
