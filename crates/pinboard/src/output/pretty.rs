//! Pretty output formatting.

use pinboard_core::pins::{EvictedPin, PinView, PinnedItem};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a pin for display.
pub fn format_pin(pin: &PinnedItem) -> String {
    format!(
        "#{} {}\n  ID: {}\n  Pinned: {}\n  Last accessed: {}",
        pin.display_order,
        pin.entity(),
        pin.id,
        pin.pinned_at.format(TIMESTAMP_FORMAT),
        pin.last_accessed_at.format(TIMESTAMP_FORMAT)
    )
}

/// Format a listed pin, with its flags.
pub fn format_view(view: &PinView) -> String {
    let mut output = format_pin(&view.pin);
    let mut flags = Vec::new();
    if view.is_stale {
        flags.push("stale");
    }
    if view.is_dangling {
        flags.push("missing entity");
    }
    if !flags.is_empty() {
        output.push_str(&format!("\n  Flags: {}", flags.join(", ")));
    }
    output
}

/// Format listed pins for display.
pub fn format_views(views: &[PinView]) -> String {
    if views.is_empty() {
        return "No pins.".to_string();
    }
    let mut output = format!("PINS ({})\n", views.len());
    output.push_str(&"-".repeat(40));
    for view in views {
        output.push_str(&format!("\n{}", format_view(view)));
        output.push('\n');
    }
    output
}

/// Format pins for display.
pub fn format_pins(pins: &[PinnedItem]) -> String {
    if pins.is_empty() {
        return "No pins.".to_string();
    }
    let mut output = format!("PINS ({})\n", pins.len());
    output.push_str(&"-".repeat(40));
    for pin in pins {
        output.push_str(&format!("\n{}", format_pin(pin)));
        output.push('\n');
    }
    output
}

/// Format removed pins for display.
pub fn format_evicted(evicted: &[EvictedPin]) -> String {
    if evicted.is_empty() {
        return "Nothing to sweep.".to_string();
    }
    let mut output = format!("REMOVED ({})\n", evicted.len());
    output.push_str(&"-".repeat(40));
    for entry in evicted {
        output.push_str(&format!(
            "\n{} [{}]\n  ID: {}\n  Last accessed: {}",
            entry.pin.entity(),
            entry.reason,
            entry.pin.id,
            entry.pin.last_accessed_at.format(TIMESTAMP_FORMAT)
        ));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pinboard_core::pins::{EntityRef, EntityType, EvictionReason};
    use uuid::Uuid;

    fn pin() -> PinnedItem {
        let at = Utc.with_ymd_and_hms(2024, 9, 30, 16, 5, 0).unwrap();
        PinnedItem::new(
            Uuid::new_v4(),
            EntityRef::new(EntityType::Routine, Uuid::nil()),
            4,
            at,
        )
    }

    #[test]
    fn test_format_pin() {
        let output = format_pin(&pin());
        assert!(output.starts_with(&format!("#4 routine:{}", Uuid::nil())));
        assert!(output.contains("Pinned: 2024-09-30 16:05"));
    }

    #[test]
    fn test_format_view_flags() {
        let view = PinView {
            pin: pin(),
            is_stale: true,
            is_dangling: true,
        };
        assert!(format_view(&view).ends_with("Flags: stale, missing entity"));

        let fresh = PinView {
            is_stale: false,
            is_dangling: false,
            ..view
        };
        assert!(!format_view(&fresh).contains("Flags"));
    }

    #[test]
    fn test_format_empty_lists() {
        assert_eq!(format_views(&[]), "No pins.");
        assert_eq!(format_evicted(&[]), "Nothing to sweep.");
    }

    #[test]
    fn test_format_evicted_shows_reason() {
        let evicted = EvictedPin {
            pin: pin(),
            reason: EvictionReason::AutoExpired,
        };
        let output = format_evicted(&[evicted]);
        assert!(output.starts_with("REMOVED (1)"));
        assert!(output.contains("[auto-expired]"));
    }
}
