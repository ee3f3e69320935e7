use crate::models::{JobId, Mode, SubmitResponse};
use std::str::FromStr;

/// Client-side pages. The job id in the URL is the only state carried
/// between them, so every page can be reloaded on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Upload,
    SelectModel { job_id: JobId },
    Processing { job_id: JobId, mode: Option<Mode> },
    NotFound,
}

impl Route {
    /// `path` is `location.pathname`; `query` is `location.search`, with or
    /// without its leading `?`.
    pub fn parse(path: &str, query: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Upload,
            ["select-model", job_id] => match decode_job_id(job_id) {
                Some(job_id) => Route::SelectModel { job_id },
                None => Route::NotFound,
            },
            ["processing", job_id] => match decode_job_id(job_id) {
                Some(job_id) => Route::Processing {
                    job_id,
                    mode: query_param(query, "mode").and_then(|m| Mode::from_str(&m).ok()),
                },
                None => Route::NotFound,
            },
            _ => Route::NotFound,
        }
    }

    pub fn href(&self) -> String {
        match self {
            Route::Upload | Route::NotFound => "/".to_string(),
            Route::SelectModel { job_id } => {
                format!("/select-model/{}", urlencoding::encode(job_id.as_str()))
            }
            Route::Processing { job_id, mode } => {
                let path = format!("/processing/{}", urlencoding::encode(job_id.as_str()));
                match mode {
                    Some(mode) => format!("{}?mode={}", path, mode),
                    None => path,
                }
            }
        }
    }
}

fn decode_job_id(segment: &str) -> Option<JobId> {
    urlencoding::decode(segment)
        .ok()
        .filter(|id| !id.is_empty())
        .map(|id| JobId::from(id.into_owned()))
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
}

impl SubmitResponse {
    /// Where to go after a successful upload. The backend's echoed mode
    /// decides, not the one picked locally. `None` when no job id came back.
    pub fn next_route(&self) -> Option<Route> {
        let job_id = self.job_id.as_deref().filter(|id| !id.is_empty())?;
        let job_id = JobId::from(job_id);
        let echoed = self.mode.as_deref().and_then(|m| Mode::from_str(m).ok());

        Some(match echoed {
            Some(Mode::QuickAnalysis) => Route::SelectModel { job_id },
            _ => Route::Processing {
                job_id,
                mode: Some(Mode::Comparison),
            },
        })
    }
}

/// Where navigation entries are recorded; `history.pushState` in the browser.
pub trait HistorySink {
    fn push(&mut self, href: &str);
}

/// Current route plus the rule for when navigating records a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Route,
}

impl Navigator {
    pub fn new(current: Route) -> Self {
        Self { current }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// In-app navigation. Pushes an entry only when the route actually
    /// changes, so repeated clicks on the active link leave history alone.
    /// Returns whether the route changed.
    pub fn navigate(&mut self, route: Route, history: &mut impl HistorySink) -> bool {
        if route == self.current {
            return false;
        }
        history.push(&route.href());
        log::debug!("Route: {}", route.href());
        self.current = route;
        true
    }

    /// Back/forward: the browser already moved, so nothing is pushed.
    pub fn sync(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        log::debug!("Route (history): {}", route.href());
        self.current = route;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", "", Route::Upload)]
    #[case("", "", Route::Upload)]
    #[case("/select-model/abc", "", Route::SelectModel { job_id: "abc".into() })]
    #[case("/select-model/abc/", "", Route::SelectModel { job_id: "abc".into() })]
    #[case(
        "/processing/abc",
        "?mode=comparison",
        Route::Processing { job_id: "abc".into(), mode: Some(Mode::Comparison) }
    )]
    #[case(
        "/processing/abc",
        "foo=1&mode=quick_analysis",
        Route::Processing { job_id: "abc".into(), mode: Some(Mode::QuickAnalysis) }
    )]
    #[case("/processing/abc", "?mode=bogus", Route::Processing { job_id: "abc".into(), mode: None })]
    #[case("/processing/a%20b", "", Route::Processing { job_id: "a b".into(), mode: None })]
    #[case("/processing", "", Route::NotFound)]
    #[case("/reports/abc", "", Route::NotFound)]
    fn parses_locations(#[case] path: &str, #[case] query: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path, query), expected);
    }

    #[test]
    fn href_parses_back_to_the_same_route() {
        let route = Route::Processing {
            job_id: "job 7".into(),
            mode: Some(Mode::QuickAnalysis),
        };
        let href = route.href();
        assert_eq!(href, "/processing/job%207?mode=quick_analysis");
        let (path, query) = href.split_once('?').unwrap();
        assert_eq!(Route::parse(path, query), route);
    }

    #[rstest]
    #[case(Some("quick_analysis"), Route::SelectModel { job_id: "j1".into() })]
    #[case(Some("comparison"), Route::Processing { job_id: "j1".into(), mode: Some(Mode::Comparison) })]
    #[case(None, Route::Processing { job_id: "j1".into(), mode: Some(Mode::Comparison) })]
    fn submit_branches_on_echoed_mode(#[case] mode: Option<&str>, #[case] expected: Route) {
        let response = SubmitResponse {
            job_id: Some("j1".into()),
            mode: mode.map(str::to_string),
        };
        assert_eq!(response.next_route(), Some(expected));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn submit_without_job_id_has_nowhere_to_go(#[case] job_id: Option<&str>) {
        let response = SubmitResponse {
            job_id: job_id.map(str::to_string),
            mode: Some("comparison".into()),
        };
        assert_eq!(response.next_route(), None);
    }

    impl HistorySink for Vec<String> {
        fn push(&mut self, href: &str) {
            self.push(href.to_string());
        }
    }

    #[test]
    fn same_route_pushes_no_history_entry() {
        let mut history: Vec<String> = Vec::new();
        let mut navigator = Navigator::new(Route::Upload);

        assert!(!navigator.navigate(Route::Upload, &mut history));
        assert!(history.is_empty());

        let processing = Route::Processing {
            job_id: "j1".into(),
            mode: Some(Mode::Comparison),
        };
        assert!(navigator.navigate(processing.clone(), &mut history));
        assert!(!navigator.navigate(processing.clone(), &mut history));
        assert_eq!(history, vec!["/processing/j1?mode=comparison".to_string()]);
        assert_eq!(navigator.current(), &processing);
    }

    #[test]
    fn back_and_forward_never_push() {
        let mut history: Vec<String> = Vec::new();
        let mut navigator = Navigator::new(Route::Upload);
        navigator.navigate(Route::SelectModel { job_id: "j1".into() }, &mut history);

        assert!(navigator.sync(Route::Upload));
        assert!(!navigator.sync(Route::Upload));
        assert_eq!(history.len(), 1);
        assert_eq!(navigator.current(), &Route::Upload);
    }
}
