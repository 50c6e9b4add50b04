//! # Display Formatters
//!
//! Human-readable byte sizes and durations for the dashboard.
//!
//! ## Why Format at Mutation Time?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Monitoring tick arrives                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  memory.active = 536870912  ──► format_bytes ──► "512.0 MB"            │
//! │  bridge.uptime = 65         ──► format_uptime ──► "1m 5s"              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Stored FORMATTED in the state tree                                     │
//! │                                                                         │
//! │  The dashboard renders the tree as-is; no component re-derives these   │
//! │  values, and the persisted snapshot already holds display strings.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Byte Sizes
// =============================================================================

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count as a human-readable size.
///
/// Uses binary (1024-based) units. Plain bytes are shown without a decimal;
/// everything above shows one decimal place.
///
/// ## Example
/// ```rust
/// use hubview_core::format::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

// =============================================================================
// Durations
// =============================================================================

/// Formats an uptime given in whole seconds as a compact duration.
///
/// Shows at most the three largest non-zero units out of days, hours,
/// minutes, and seconds. Zero renders as `"0s"`.
///
/// ## Example
/// ```rust
/// use hubview_core::format::format_uptime;
///
/// assert_eq!(format_uptime(0), "0s");
/// assert_eq!(format_uptime(65), "1m 5s");
/// assert_eq!(format_uptime(90_061), "1d 1h 1m");
/// ```
pub fn format_uptime(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }

    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    let parts = [
        (days, "d"),
        (hours, "h"),
        (minutes, "m"),
        (secs, "s"),
    ];

    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .take(3)
        .map(|(value, suffix)| format!("{}{}", value, suffix))
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Unit Tests
// =============================================================================
