//! Library version and known hub endpoints.

/// Protocol version stamped into every message envelope and the signing domain.
pub const VERSION: &str = "0.1.3";

/// Known hub addresses, in priority order.
pub const HUBS: [&str; 2] = ["https://hub.snapshot.org", "https://testnet.snapshot.org"];

/// Hub used when no address is configured.
pub const DEFAULT_HUB_URL: &str = HUBS[0];
