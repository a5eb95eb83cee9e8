//! Category-to-icon mapping for feed presentation.
//!
//! A total pure function with an explicit default case, testable without
//! any rendering framework. The dashboard resolves the symbolic identifier
//! to an actual glyph.

use mediahub_types::{EventKind, FeedIcon};

/// The icon identifier for a feed event category.
///
/// Every known kind maps to a distinct icon; the fallback category maps to
/// the default [`FeedIcon::File`].
pub const fn icon_for(kind: EventKind) -> FeedIcon {
    match kind {
        EventKind::Media => FeedIcon::Image,
        EventKind::Message => FeedIcon::MessageBubble,
        EventKind::Channel => FeedIcon::Broadcast,
        EventKind::Other => FeedIcon::File,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_map_to_distinct_icons() {
        let icons = [
            icon_for(EventKind::Media),
            icon_for(EventKind::Message),
            icon_for(EventKind::Channel),
        ];

        for (i, a) in icons.iter().enumerate() {
            for b in icons.iter().skip(i.saturating_add(1)) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn fallback_kind_maps_to_default_icon() {
        assert_eq!(icon_for(EventKind::Other), FeedIcon::File);
    }
}
