//! Paths of the builder's screens and shareable fill-out links.

use std::fmt;

use url::Url;
use uuid::Uuid;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    /// `None` opens the builder on a fresh document.
    Builder(Option<Uuid>),
    View(Uuid),
}

impl Route {
    /// Parses `/`, `/builder/new`, `/builder/<id>` and `/view/<id>`.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Some(Route::Dashboard),
            ["builder"] | ["builder", "new"] => Some(Route::Builder(None)),
            ["builder", id] => Uuid::parse_str(id).ok().map(|id| Route::Builder(Some(id))),
            ["view", id] => Uuid::parse_str(id).ok().map(Route::View),
            _ => None,
        }
    }

    /// Reads a route out of a bare path or a full link such as one from
    /// [`share_link`]. A base path in front of the route is ignored.
    pub fn from_link(link: &str) -> Option<Self> {
        let link = link.trim();
        let path = match Url::parse(link) {
            Ok(url) => url.path().to_string(),
            Err(_) => link.to_string(),
        };
        if let Some(route) = Self::parse(&path) {
            return Some(route);
        }
        let start = ["/view/", "/builder/"]
            .iter()
            .filter_map(|marker| path.rfind(marker))
            .max()?;
        Self::parse(&path[start..])
    }

    /// Form the route points at, when it names one.
    pub fn form_id(&self) -> Option<Uuid> {
        match self {
            Route::Builder(Some(id)) | Route::View(id) => Some(*id),
            Route::Dashboard | Route::Builder(None) => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Builder(None) => "/builder/new".to_string(),
            Route::Builder(Some(id)) => format!("/builder/{id}"),
            Route::View(id) => format!("/view/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Absolute link to the fill-out view of `form_id` under `base`.
pub fn share_link(base: &str, form_id: Uuid) -> Result<Url, CoreError> {
    let mut base = Url::parse(base)
        .map_err(|err| CoreError::InvalidOperation(format!("invalid share base URL: {err}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(Route::View(form_id).path().trim_start_matches('/'))
        .map_err(|err| CoreError::InvalidOperation(format!("invalid share link: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        let id = Uuid::new_v4();
        assert_eq!(Route::parse("/"), Some(Route::Dashboard));
        assert_eq!(Route::parse("/builder/new"), Some(Route::Builder(None)));
        assert_eq!(
            Route::parse(&format!("/builder/{id}")),
            Some(Route::Builder(Some(id)))
        );
        assert_eq!(Route::parse(&format!("/view/{id}/")), Some(Route::View(id)));
        assert_eq!(Route::parse("/view/not-an-id"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn paths_parse_back() {
        let id = Uuid::new_v4();
        for route in [Route::Dashboard, Route::Builder(None), Route::View(id)] {
            assert_eq!(Route::parse(&route.to_string()), Some(route));
        }
    }

    #[test]
    fn links_resolve_to_routes() {
        let id = Uuid::new_v4();
        let link = share_link("https://forms.example.com/app", id).expect("valid base");
        assert_eq!(Route::from_link(link.as_str()), Some(Route::View(id)));
        assert_eq!(
            Route::from_link(&format!("/builder/{id}")),
            Some(Route::Builder(Some(id)))
        );
        assert_eq!(Route::View(id).form_id(), Some(id));
        assert_eq!(Route::Builder(None).form_id(), None);
        assert_eq!(Route::from_link("https://forms.example.com/app/settings"), None);
        assert_eq!(Route::from_link("3"), None);
    }

    #[test]
    fn share_link_keeps_base_path() {
        let id = Uuid::new_v4();
        let link = share_link("https://forms.example.com/app", id).expect("valid base");
        assert_eq!(link.as_str(), format!("https://forms.example.com/app/view/{id}"));
        assert!(share_link("not a url", id).is_err());
    }
}
