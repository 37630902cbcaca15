//! HTTP client helper with native-tls support.
//!
//! All outbound requests (lookup service, flag assets) go through one agent
//! configuration: native-tls with the platform's root certificates, which
//! works better in VM environments where ring/rustls may have issues, plus a
//! global call timeout.

use std::time::Duration;

use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Global timeout for all HTTP operations.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum response body size for lookup responses (2 MB).
pub const MAX_RESPONSE_SIZE: u64 = 2 * 1024 * 1024;

/// Maximum response body size for flag asset downloads (5 MB).
pub const MAX_ASSET_SIZE: u64 = 5 * 1024 * 1024;

/// Create a new HTTP agent configured with native-tls.
///
/// Uses the system's TLS library (Schannel on Windows, OpenSSL on Linux,
/// Security.framework on macOS) and the platform's built-in root
/// certificates.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}
