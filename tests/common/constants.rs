//! Shared constants for end-to-end tests.

/// Request timeout for the test client.
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// A user ID the upstream auth layer would assert via `x-user-id`.
pub const TEST_USER: &str = "user-1";

/// Video IDs used across tests (valid 11-character IDs).
pub const VIDEO_1: &str = "dQw4w9WgXcQ";
pub const VIDEO_2: &str = "9bZkp7q19f0";
pub const VIDEO_3: &str = "kJQP7kiw5Fk";

/// A video the stub fetcher has no maxres image for.
pub const VIDEO_NO_MAXRES: &str = "JGwWNGJdvx8";

/// A video the stub fetcher serves nothing for, at any tier.
pub const VIDEO_MISSING: &str = "00000000000";
