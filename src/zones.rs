/// Zone
///
/// Access-policy bucket a request path falls into. The guard decides purely on
/// the zone, the presence of a session token and the verified role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Sign-in / sign-up pages. The only zone reachable without a session.
    PublicAuth,
    /// "Request admin access" page for signed-in users without the admin role.
    AdminRequest,
    /// The admin dashboard tree.
    AdminDashboard,
    /// Anything the table does not classify. Denied by default.
    Other,
}

/// How a rule matches a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// The path itself (a trailing slash is tolerated).
    Exact,
    /// The path and every path below it, segment-aware.
    Prefix,
}

#[derive(Debug, Clone)]
pub struct ZoneRule {
    pub path: &'static str,
    pub matching: Match,
    pub zone: Zone,
}

/// ZoneTable
///
/// The single classification table consumed by the route guard. It also owns
/// the landing path of each zone, which is where redirects point.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    rules: Vec<ZoneRule>,
}

pub const AUTH_PATH: &str = "/auth";
pub const ADMIN_REQUEST_PATH: &str = "/admin";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";

impl Default for ZoneTable {
    fn default() -> Self {
        Self::new(vec![
            ZoneRule {
                path: AUTH_PATH,
                matching: Match::Prefix,
                zone: Zone::PublicAuth,
            },
            ZoneRule {
                path: ADMIN_REQUEST_PATH,
                matching: Match::Exact,
                zone: Zone::AdminRequest,
            },
            ZoneRule {
                path: ADMIN_DASHBOARD_PATH,
                matching: Match::Prefix,
                zone: Zone::AdminDashboard,
            },
        ])
    }
}

impl ZoneTable {
    pub fn new(rules: Vec<ZoneRule>) -> Self {
        Self { rules }
    }

    /// classify
    ///
    /// Returns the zone of the most specific matching rule, or `Zone::Other`.
    /// Rules see the path in the form the file server resolves it (see [`normalize`]);
    /// a path that does not normalize is `Zone::Other`.
    pub fn classify(&self, path: &str) -> Zone {
        let Some(path) = normalize(path) else {
            return Zone::Other;
        };
        self.rules
            .iter()
            .filter(|rule| rule.matches(&path))
            .max_by_key(|rule| rule.path.len())
            .map(|rule| rule.zone)
            .unwrap_or(Zone::Other)
    }

    /// Landing path for a zone. `Other` has none.
    pub fn landing(&self, zone: Zone) -> Option<&'static str> {
        match zone {
            Zone::PublicAuth => Some(AUTH_PATH),
            Zone::AdminRequest => Some(ADMIN_REQUEST_PATH),
            Zone::AdminDashboard => Some(ADMIN_DASHBOARD_PATH),
            Zone::Other => None,
        }
    }
}

/// normalize
///
/// Percent-decodes the path and drops empty and `.` segments, so `//admin`,
/// `/%61dmin` and `/./admin` all read `/admin`. `None` for `..` segments or
/// bytes that are not UTF-8.
pub fn normalize(path: &str) -> Option<String> {
    let decoded = urlencoding::decode(path).ok()?;
    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            segment => segments.push(segment),
        }
    }
    Some(format!("/{}", segments.join("/")))
}

impl ZoneRule {
    fn matches(&self, path: &str) -> bool {
        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match self.matching {
            Match::Exact => trimmed == self.path,
            Match::Prefix => match trimmed.strip_prefix(self.path) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auth_tree() {
        let table = ZoneTable::default();
        assert_eq!(table.classify("/auth"), Zone::PublicAuth);
        assert_eq!(table.classify("/auth/"), Zone::PublicAuth);
        assert_eq!(table.classify("/auth/sign-up"), Zone::PublicAuth);
    }

    #[test]
    fn prefix_match_respects_segments() {
        let table = ZoneTable::default();
        assert_eq!(table.classify("/authors"), Zone::Other);
        assert_eq!(table.classify("/admin/dashboards"), Zone::Other);
    }

    #[test]
    fn admin_request_is_exact() {
        let table = ZoneTable::default();
        assert_eq!(table.classify("/admin"), Zone::AdminRequest);
        assert_eq!(table.classify("/admin/"), Zone::AdminRequest);
        assert_eq!(table.classify("/admin/settings"), Zone::Other);
    }

    #[test]
    fn dashboard_tree_wins_over_admin() {
        let table = ZoneTable::default();
        assert_eq!(table.classify("/admin/dashboard"), Zone::AdminDashboard);
        assert_eq!(
            table.classify("/admin/dashboard/blogs/new"),
            Zone::AdminDashboard
        );
    }

    #[test]
    fn alternate_spellings_classify_like_the_canonical_path() {
        let table = ZoneTable::default();
        assert_eq!(table.classify("//admin/dashboard/"), Zone::AdminDashboard);
        assert_eq!(table.classify("/%61dmin/dashboard/"), Zone::AdminDashboard);
        assert_eq!(table.classify("/./admin/dashboard/"), Zone::AdminDashboard);
        assert_eq!(table.classify("/admin/./"), Zone::AdminRequest);
        assert_eq!(table.classify("/auth%2fsign-in"), Zone::PublicAuth);
    }

    #[test]
    fn climbing_paths_are_other() {
        let table = ZoneTable::default();
        assert_eq!(table.classify("/auth/../admin/dashboard"), Zone::Other);
        assert_eq!(table.classify("/auth/%2e%2e/admin/dashboard"), Zone::Other);
        assert_eq!(normalize("/auth/%ff"), None);
    }

    #[test]
    fn unknown_paths_are_other() {
        let table = ZoneTable::default();
        assert_eq!(table.classify("/"), Zone::Other);
        assert_eq!(table.classify("/blog/hello-world"), Zone::Other);
        assert_eq!(table.landing(Zone::Other), None);
    }
}
