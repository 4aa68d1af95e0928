//! Application constants
//!
//! Centralized location for protocol and payload constants used throughout
//! the application.

// Host query
/// Largest page the host query endpoints accept
pub const HOST_QUERY_PAGE_SIZE: usize = 5000;
/// Platform filter baked into every host query
pub const HOST_PLATFORM_FILTER: &str = "platform_name:'Windows'";

// Batch sessions
/// Status code the command endpoint returns for an accepted command
pub const COMMAND_ACCEPTED_STATUS: u16 = 201;

// Token cache
pub const DEFAULT_TOKEN_MAX_AGE_SECS: u64 = 1799;
pub const DEFAULT_TOKEN_FILENAME: &str = "token.txt";

// Transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Registry payload
pub const BASE_COMMAND_REG_DELETE: &str = "reg delete";
pub const BASE_COMMAND_REG_SET: &str = "reg set";
pub const PROXY_HOSTNAME_VALUE: &str = "CsProxyHostname";
pub const PROXY_PORT_VALUE: &str = "CsProxyport";

/// Stale proxy values removed from every store before the new ones are set
pub const DEFAULT_KEYS_TO_DELETE: [&str; 4] = ["DisableProxy", "PAC", "PN", "PP"];

/// Agent registry stores holding proxy settings
pub const DEFAULT_REGISTRY_STORES: [&str; 2] = [
    r"HKLM:\SYSTEM\Crowdstrike\{9b03c1d9-3138-44ed-9fae-d9f4c034b88d}\{16e0423f-7058-48c9-a204-725362b67639}\Default",
    r"HKLM:\SYSTEM\CurrentControlSet\Services\CSAgent\Sim",
];
