//! Per-call decision value object

use serde::Serialize;
use std::fmt;

use crate::value_objects::AssaultKind;

/// The verdict the engine produces for one intercepted call
///
/// Ephemeral: it exists for the duration of the call and its report, and is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    excluded: bool,
    watched: bool,
    fired: bool,
    assault: Option<AssaultKind>,
}

impl Decision {
    /// The call site is outside every watched layer, toggled off, or the
    /// engine is disabled
    #[must_use]
    pub const fn not_watched() -> Self {
        Self {
            excluded: false,
            watched: false,
            fired: false,
            assault: None,
        }
    }

    /// The call site matched an exclusion rule
    #[must_use]
    pub const fn excluded() -> Self {
        Self {
            excluded: true,
            watched: false,
            fired: false,
            assault: None,
        }
    }

    /// Watched, but the probability draw (or an empty candidate set) spared
    /// the call
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            excluded: false,
            watched: true,
            fired: false,
            assault: None,
        }
    }

    /// Watched and firing the given assault
    #[must_use]
    pub fn fire(assault: AssaultKind) -> Self {
        Self {
            excluded: false,
            watched: true,
            fired: true,
            assault: Some(assault),
        }
    }

    /// Whether an exclusion rule removed the call
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Whether the call was under watch
    #[must_use]
    pub const fn is_watched(&self) -> bool {
        self.watched
    }

    /// Whether an assault fires for the call
    #[must_use]
    pub const fn is_fired(&self) -> bool {
        self.fired
    }

    /// The chosen assault, present exactly when the decision fired
    #[must_use]
    pub const fn assault(&self) -> Option<&AssaultKind> {
        self.assault.as_ref()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.assault, self.fired, self.watched, self.excluded) {
            (Some(kind), ..) => write!(f, "fire {kind}"),
            (None, _, true, _) => write!(f, "pass"),
            (None, _, _, true) => write!(f, "excluded"),
            (None, ..) => write!(f, "not watched"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_watched_has_no_flags_set() {
        let decision = Decision::not_watched();
        assert!(!decision.is_excluded());
        assert!(!decision.is_watched());
        assert!(!decision.is_fired());
        assert!(decision.assault().is_none());
    }

    #[test]
    fn excluded_is_not_watched() {
        let decision = Decision::excluded();
        assert!(decision.is_excluded());
        assert!(!decision.is_watched());
        assert!(!decision.is_fired());
    }

    #[test]
    fn pass_is_watched_without_firing() {
        let decision = Decision::pass();
        assert!(decision.is_watched());
        assert!(!decision.is_fired());
        assert!(decision.assault().is_none());
    }

    #[test]
    fn fire_carries_the_assault() {
        let decision = Decision::fire(AssaultKind::Latency);
        assert!(decision.is_watched());
        assert!(decision.is_fired());
        assert_eq!(decision.assault(), Some(&AssaultKind::Latency));
    }

    #[test]
    fn display_forms() {
        assert_eq!(format!("{}", Decision::not_watched()), "not watched");
        assert_eq!(format!("{}", Decision::excluded()), "excluded");
        assert_eq!(format!("{}", Decision::pass()), "pass");
        assert_eq!(format!("{}", Decision::fire(AssaultKind::Exception)), "fire exception");
    }

    #[test]
    fn serializes_for_reporting() {
        let decision = Decision::fire(AssaultKind::Latency);
        let json = serde_json::to_value(&decision).expect("serialize");
        assert_eq!(json["watched"], true);
        assert_eq!(json["fired"], true);
        assert_eq!(json["assault"], "latency");
    }
}
