//! Animated country-flag indicator.
//!
//! Flags come from an external asset repository as `.tgs` files (gzipped
//! Lottie animations), addressed by country code. Showing a flag clears the
//! previous element, mounts a new one configured for autoplay and looping at
//! a fixed size, and fetches the asset on a worker thread. A failed fetch is
//! cosmetic degradation only: the badge simply animates without timeline
//! metadata.
//!
//! The code is used verbatim in the asset URL: whatever casing the lookup
//! service returned is what the repository is asked for.

use std::io::Read;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde_json::Value;

/// Display size of the flag element, logical pixels (square).
pub const FLAG_SIZE: f32 = 150.0;

/// Fallback animation cycle used until the asset's own timeline is known.
const DEFAULT_CYCLE_SECS: f32 = 2.0;

/// Compose the asset URL for `code`: `{base}/{code}.tgs`.
pub fn flag_asset_url(base: &str, code: &str) -> String {
    format!("{}/{}.tgs", base.trim_end_matches('/'), code)
}

/// Timeline header of a Lottie animation: canvas size, frame rate, and the
/// in/out frame points.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMeta {
    pub width: f64,
    pub height: f64,
    pub frame_rate: f64,
    pub in_point: f64,
    pub out_point: f64,
}

impl TimelineMeta {
    /// Length of one playback cycle in seconds.
    pub fn cycle_secs(&self) -> f64 {
        if self.frame_rate > 0.0 {
            (self.out_point - self.in_point).max(0.0) / self.frame_rate
        } else {
            0.0
        }
    }
}

/// Decode the timeline header from a raw `.tgs` payload (gzip-wrapped
/// Lottie JSON). Returns `None` for anything that does not decode.
pub fn decode_timeline(tgs: &[u8]) -> Option<TimelineMeta> {
    let mut text = String::new();
    flate2::read::GzDecoder::new(tgs)
        .read_to_string(&mut text)
        .ok()?;
    let doc: Value = serde_json::from_str(&text).ok()?;

    Some(TimelineMeta {
        width: doc.get("w")?.as_f64()?,
        height: doc.get("h")?.as_f64()?,
        frame_rate: doc.get("fr")?.as_f64()?,
        in_point: doc.get("ip")?.as_f64()?,
        out_point: doc.get("op")?.as_f64()?,
    })
}

/// A mounted flag element: where its asset lives and how it plays.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagElement {
    pub country_code: String,
    pub src: String,
    pub autoplay: bool,
    pub looping: bool,
    /// Edge length in logical pixels.
    pub size: f32,
}

/// Fetch progress for the mounted element's asset.
#[derive(Debug, Clone, Default, PartialEq)]
enum AssetState {
    #[default]
    Pending,
    Ready(TimelineMeta),
    Unavailable,
}

/// The flag container: at most one mounted element, visible or hidden.
pub struct FlagIndicator {
    agent: ureq::Agent,
    base_url: String,
    visible: bool,
    element: Option<FlagElement>,
    asset: Arc<Mutex<AssetState>>,
    started_at: Option<Instant>,
}

impl FlagIndicator {
    pub fn new(agent: ureq::Agent, base_url: String) -> Self {
        Self {
            agent,
            base_url,
            visible: false,
            element: None,
            asset: Arc::new(Mutex::new(AssetState::Pending)),
            started_at: None,
        }
    }

    /// Mount and show the flag for `code`. No-op when the code is empty.
    ///
    /// Clears any previously mounted element first, then starts the asset
    /// fetch in the background. Playback begins immediately (autoplay); the
    /// fetched timeline only refines the cycle length.
    pub fn show(&mut self, code: &str) {
        if code.is_empty() {
            return;
        }

        self.clear();
        debug_trace!("flag", "mounting flag for {code}");

        let src = flag_asset_url(&self.base_url, code);
        self.element = Some(FlagElement {
            country_code: code.to_string(),
            src: src.clone(),
            autoplay: true,
            looping: true,
            size: FLAG_SIZE,
        });
        self.visible = true;
        self.started_at = Some(Instant::now());

        let agent = self.agent.clone();
        let asset = Arc::clone(&self.asset);
        std::thread::spawn(move || {
            let state = match fetch_asset(&agent, &src) {
                Ok(bytes) => match decode_timeline(&bytes) {
                    Some(meta) => AssetState::Ready(meta),
                    None => {
                        log::debug!("flag asset {src} did not decode as a Lottie timeline");
                        AssetState::Unavailable
                    }
                },
                Err(e) => {
                    log::debug!("flag asset fetch failed for {src}: {e}");
                    AssetState::Unavailable
                }
            };
            *asset.lock() = state;
        });
    }

    /// Hide the container. The mounted element is kept; a subsequent `show`
    /// replaces it.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    fn clear(&mut self) {
        self.element = None;
        self.started_at = None;
        *self.asset.lock() = AssetState::Pending;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The mounted element, if any.
    pub fn element(&self) -> Option<&FlagElement> {
        self.element.as_ref()
    }

    /// Timeline metadata once the asset fetch has completed and decoded.
    pub fn timeline(&self) -> Option<TimelineMeta> {
        match &*self.asset.lock() {
            AssetState::Ready(meta) => Some(meta.clone()),
            _ => None,
        }
    }

    /// Whether the element is animating (and the UI should keep repainting).
    pub fn is_playing(&self) -> bool {
        self.visible
            && self
                .element
                .as_ref()
                .is_some_and(|element| element.autoplay)
    }

    /// Playback position in `[0, 1)` at `now`, looping over the asset's
    /// cycle (or a fallback cycle until the timeline is known).
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        let cycle = self
            .timeline()
            .map(|meta| meta.cycle_secs() as f32)
            .filter(|&secs| secs > 0.0)
            .unwrap_or(DEFAULT_CYCLE_SECS);
        let elapsed = now.duration_since(started_at).as_secs_f32();
        (elapsed / cycle).fract()
    }
}

fn fetch_asset(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, ureq::Error> {
    agent
        .get(url)
        .call()?
        .into_body()
        .with_config()
        .limit(crate::http::MAX_ASSET_SIZE)
        .read_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tgs_fixture(json: &str) -> Vec<u8> {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    fn indicator() -> FlagIndicator {
        FlagIndicator::new(crate::http::agent(), "https://flags.example/tgs".to_string())
    }

    #[test]
    fn test_asset_url_composition() {
        assert_eq!(
            flag_asset_url("https://flags.example/tgs", "US"),
            "https://flags.example/tgs/US.tgs"
        );
        assert_eq!(
            flag_asset_url("https://flags.example/tgs/", "NO"),
            "https://flags.example/tgs/NO.tgs"
        );
    }

    #[test]
    fn test_asset_url_preserves_casing() {
        // Whatever casing the service returns is what the repository sees.
        assert_eq!(
            flag_asset_url("https://flags.example/tgs", "de"),
            "https://flags.example/tgs/de.tgs"
        );
        assert_eq!(
            flag_asset_url("https://flags.example/tgs", "De"),
            "https://flags.example/tgs/De.tgs"
        );
    }

    #[test]
    fn test_show_mounts_configured_element() {
        let mut flag = indicator();
        flag.show("US");

        assert!(flag.is_visible());
        let element = flag.element().unwrap();
        assert_eq!(element.country_code, "US");
        assert_eq!(element.src, "https://flags.example/tgs/US.tgs");
        assert!(element.autoplay);
        assert!(element.looping);
        assert_eq!(element.size, FLAG_SIZE);
        assert!(flag.is_playing());
    }

    #[test]
    fn test_show_empty_code_is_noop() {
        let mut flag = indicator();
        flag.show("");
        assert!(!flag.is_visible());
        assert!(flag.element().is_none());
    }

    #[test]
    fn test_show_replaces_previous_element() {
        let mut flag = indicator();
        flag.show("US");
        flag.show("NO");
        assert_eq!(flag.element().unwrap().country_code, "NO");
    }

    #[test]
    fn test_hide_keeps_element() {
        let mut flag = indicator();
        flag.show("US");
        flag.hide();
        assert!(!flag.is_visible());
        assert!(!flag.is_playing());
        assert!(flag.element().is_some());
    }

    #[test]
    fn test_decode_timeline() {
        let tgs = tgs_fixture(r#"{"w": 512, "h": 512, "fr": 60, "ip": 0, "op": 180}"#);
        let meta = decode_timeline(&tgs).unwrap();
        assert_eq!(meta.width, 512.0);
        assert_eq!(meta.frame_rate, 60.0);
        assert_eq!(meta.cycle_secs(), 3.0);
    }

    #[test]
    fn test_decode_timeline_rejects_garbage() {
        assert!(decode_timeline(b"not gzip at all").is_none());
        let not_lottie = tgs_fixture(r#"{"unexpected": true}"#);
        assert!(decode_timeline(&not_lottie).is_none());
    }

    #[test]
    fn test_progress_wraps() {
        let mut flag = indicator();
        flag.show("US");
        let progress = flag.progress(Instant::now());
        assert!((0.0..1.0).contains(&progress));
    }
}
