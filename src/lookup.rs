//! Client for the geolocation lookup service.
//!
//! One lookup is one `GET {endpoint}/api/v1/geoip/lookup/{ip}` issued on a
//! worker thread. The input string travels to the service verbatim; the
//! service owns IP-syntax validation and rejects what it cannot parse.
//!
//! The client publishes its progress through an explicit [`LookupPhase`]
//! shared with the UI. Overlapping lookups are neither de-duplicated nor
//! cancelled: each completion overwrites the shared phase in arrival order,
//! so the last response to arrive is the one displayed.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Path prefix of the lookup endpoint, relative to the service base URL.
pub const LOOKUP_PATH: &str = "/api/v1/geoip/lookup";

/// Why a lookup failed.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure or a non-success status from the service.
    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),
    /// The response body was not decodable as JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decoded lookup payload. The service returns an open-ended object; the
/// widget keeps it as-is and only gives the optional `code` field special
/// treatment (it drives the flag indicator).
#[derive(Debug, Clone)]
pub struct LookupResult {
    payload: Value,
}

impl LookupResult {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// The raw decoded payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The ISO-3166-1 alpha-2 country code, when the payload carries one.
    /// Returned exactly as the service sent it; casing is not normalized.
    pub fn country_code(&self) -> Option<&str> {
        self.payload
            .get("code")
            .and_then(Value::as_str)
            .filter(|code| !code.is_empty())
    }

    /// Typed view of the payload, for callers that want named fields rather
    /// than the open object. Unknown fields are ignored.
    pub fn record(&self) -> Option<GeoRecord> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// The service's response model. Every field is optional: lookups for
/// addresses absent from the geolocation databases come back mostly null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoRecord {
    pub ip: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,
    pub continent_code: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tz: Option<String>,
    pub currency: Option<String>,
    pub isp: Option<String>,
    pub asn: Option<u32>,
}

/// Where a lookup session currently stands. The result region renders
/// directly from this.
#[derive(Debug, Clone, Default)]
pub enum LookupPhase {
    /// No lookup yet; the result region is hidden.
    #[default]
    Idle,
    /// A request is in flight; the result region shows a loading indicator.
    Loading,
    /// The last response to arrive, decoded.
    Success(LookupResult),
    /// The last failure to arrive, with its description.
    Failed(String),
}

impl LookupPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupPhase::Loading)
    }
}

/// Compose the lookup URL for `ip`. The input is placed into the path
/// literally, with no escaping and no syntax checks.
pub fn lookup_url(endpoint: &str, ip: &str) -> String {
    format!("{}{}/{}", endpoint.trim_end_matches('/'), LOOKUP_PATH, ip)
}

/// Perform one blocking lookup round-trip.
pub fn fetch_lookup(
    agent: &ureq::Agent,
    endpoint: &str,
    ip: &str,
) -> Result<LookupResult, LookupError> {
    let url = lookup_url(endpoint, ip);
    log::debug!("lookup request: {url}");

    let body = agent
        .get(&url)
        .header("Accept", "application/json")
        .call()?
        .into_body()
        .with_config()
        .limit(crate::http::MAX_RESPONSE_SIZE)
        .read_to_string()?;

    let payload: Value = serde_json::from_str(&body)?;
    Ok(LookupResult::new(payload))
}

/// Shared slot the worker threads publish into. The revision bumps on every
/// write so the UI can tell "a new phase arrived" apart from "same phase,
/// next frame". Overlapping lookups overwrite the slot in arrival order.
#[derive(Debug, Default)]
struct PhaseSlot {
    revision: u64,
    phase: LookupPhase,
}

impl PhaseSlot {
    fn publish(&mut self, phase: LookupPhase) {
        self.revision += 1;
        self.phase = phase;
    }
}

/// Dispatches lookups and shares their phase with the UI.
pub struct LookupClient {
    agent: ureq::Agent,
    endpoint: String,
    slot: Arc<Mutex<PhaseSlot>>,
}

impl LookupClient {
    pub fn new(agent: ureq::Agent, endpoint: String) -> Self {
        Self {
            agent,
            endpoint,
            slot: Arc::new(Mutex::new(PhaseSlot::default())),
        }
    }

    /// Base URL of the service this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> LookupPhase {
        self.slot.lock().phase.clone()
    }

    /// Snapshot of the current revision and phase together.
    pub fn snapshot(&self) -> (u64, LookupPhase) {
        let slot = self.slot.lock();
        (slot.revision, slot.phase.clone())
    }

    /// Start a lookup for `ip` on a worker thread.
    ///
    /// The caller is responsible for trimming and for rejecting empty input
    /// before invoking; an empty string would simply be forwarded to the
    /// service like any other unparseable input.
    ///
    /// Sets the phase to `Loading` immediately. The worker publishes
    /// `Success` or `Failed` when the round-trip finishes; with overlapping
    /// lookups, whichever response arrives last wins the slot.
    pub fn perform_lookup(&self, ip: &str) {
        debug_log!("lookup", "dispatching lookup for {ip}");
        self.slot.lock().publish(LookupPhase::Loading);

        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let ip = ip.to_string();
        let slot = Arc::clone(&self.slot);

        std::thread::spawn(move || {
            let outcome = match fetch_lookup(&agent, &endpoint, &ip) {
                Ok(result) => {
                    log::info!("lookup for {ip} succeeded");
                    LookupPhase::Success(result)
                }
                Err(e) => {
                    log::warn!("lookup for {ip} failed: {e}");
                    LookupPhase::Failed(e.to_string())
                }
            };
            slot.lock().publish(outcome);
        });
    }
}
