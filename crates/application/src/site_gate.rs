use std::collections::BTreeSet;

use forum_domain::Actor;

/// Boundary check deciding which request paths an actor may reach at all.
///
/// Every path is reachable except those containing a superuser-only segment,
/// which only superusers may reach. Segments are compared whole, so
/// `/api/login` is gated while `/api/loginless` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAccessGate {
    superuser_only_segments: BTreeSet<String>,
}

impl SiteAccessGate {
    /// Segment gated when no configuration is given.
    pub const DEFAULT_SUPERUSER_ONLY_SEGMENT: &'static str = "login";

    /// Creates a gate for the given path segments. Blank entries are ignored.
    #[must_use]
    pub fn new<I, S>(superuser_only_segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            superuser_only_segments: superuser_only_segments
                .into_iter()
                .map(|segment| segment.as_ref().trim().trim_matches('/').to_owned())
                .filter(|segment| !segment.is_empty())
                .collect(),
        }
    }

    /// Returns the gated segments.
    #[must_use]
    pub fn superuser_only_segments(&self) -> &BTreeSet<String> {
        &self.superuser_only_segments
    }

    /// Returns whether `path` contains a superuser-only segment.
    #[must_use]
    pub fn guards(&self, path: &str) -> bool {
        path.split('/')
            .any(|segment| self.superuser_only_segments.contains(segment))
    }

    /// Returns whether `actor` may reach `path`.
    #[must_use]
    pub fn is_reachable(&self, path: &str, actor: &Actor) -> bool {
        actor.is_superuser() || !self.guards(path)
    }
}

impl Default for SiteAccessGate {
    fn default() -> Self {
        Self::new([Self::DEFAULT_SUPERUSER_ONLY_SEGMENT])
    }
}

#[cfg(test)]
mod tests {
    use forum_domain::{Actor, UserId};

    use super::SiteAccessGate;

    #[test]
    fn ordinary_paths_are_public() {
        let gate = SiteAccessGate::default();

        assert!(gate.is_reachable("/api/questions", &Actor::anonymous()));
        assert!(gate.is_reachable("/api/questions/loginless", &Actor::member(UserId::new())));
    }

    #[test]
    fn login_segment_is_superuser_only() {
        let gate = SiteAccessGate::default();

        assert!(!gate.is_reachable("/admin/login/", &Actor::anonymous()));
        assert!(!gate.is_reachable("/admin/login", &Actor::staff(UserId::new())));
        assert!(gate.is_reachable("/admin/login", &Actor::superuser(UserId::new())));
    }

    #[test]
    fn guarded_paths_match_whole_segments() {
        let gate = SiteAccessGate::default();

        assert!(gate.guards("/login"));
        assert!(gate.guards("/admin/login/?next=/admin/"));
        assert!(!gate.guards("/api/loginless"));
        assert!(!gate.guards("/api/questions"));
    }

    #[test]
    fn configured_segments_replace_the_default() {
        let gate = SiteAccessGate::new(["/backstage/", " ", "audit"]);

        assert_eq!(gate.superuser_only_segments().len(), 2);
        assert!(gate.is_reachable("/login", &Actor::anonymous()));
        assert!(!gate.is_reachable("/backstage/questions", &Actor::anonymous()));
        assert!(!gate.is_reachable("/api/audit", &Actor::member(UserId::new())));
    }
}
