//! Rotating placeholder hints for the IP input field.
//!
//! Cycles through a fixed pool of well-known resolver addresses so the empty
//! input always suggests something valid to type.

use std::time::Duration;

/// Default example pool: public DNS resolvers across several operators.
pub const EXAMPLE_IPS: [&str; 6] = [
    "8.8.8.8",         // Google DNS
    "1.1.1.1",         // Cloudflare
    "208.67.222.222",  // OpenDNS
    "185.228.168.168", // CleanBrowsing
    "9.9.9.9",         // Quad9
    "64.6.64.6",       // Verisign
];

/// Time between rotation ticks.
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(3000);

/// Owns the example pool and the cyclic index. The event loop calls
/// [`PlaceholderRotator::tick`] once at startup and then on every interval.
#[derive(Debug, Clone)]
pub struct PlaceholderRotator {
    examples: Vec<String>,
    index: usize,
}

impl PlaceholderRotator {
    /// Build a rotator over `examples`, falling back to [`EXAMPLE_IPS`] when
    /// the list is empty.
    pub fn new(examples: Vec<String>) -> Self {
        let examples = if examples.is_empty() {
            EXAMPLE_IPS.iter().map(|s| s.to_string()).collect()
        } else {
            examples
        };
        Self { examples, index: 0 }
    }

    /// Hint text for the current example, advancing the index by one
    /// (mod pool size).
    pub fn tick(&mut self) -> String {
        let hint = format!("Enter an IP address (e.g., {})", self.examples[self.index]);
        self.index = (self.index + 1) % self.examples.len();
        hint
    }

    /// Number of examples in the pool.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the pool is empty. Never true: `new` substitutes the default
    /// pool for an empty list.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Index the next tick will use.
    pub fn current_index(&self) -> usize {
        self.index
    }
}

impl Default for PlaceholderRotator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
