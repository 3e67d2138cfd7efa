use std::convert::TryFrom;
use std::fmt;

use crate::domain::{normalize_geo, CompareQuery, TrendsQuery};
use crate::error::TrendsError;

/// What the primary search slot is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Keyword(TrendsQuery),
    Compare(CompareQuery),
}

impl SearchRequest {
    pub fn describe(&self) -> String {
        match self {
            Self::Keyword(query) => format!("\"{}\"", query.keyword()),
            Self::Compare(query) => query.keywords().join(" vs "),
        }
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchState {
    Idle,
    Searching,
    Succeeded,
    Failed,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Searching => write!(f, "Searching"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    Start(SearchRequest),
    Succeeded,
    Failed(String),
    Reset,
}

impl fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(request) => write!(f, "Start({request})"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
pub struct StateTransitionError {
    pub from: SearchState,
    pub event: SearchEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

struct NextState(SearchState);

impl TryFrom<(SearchState, &SearchEvent)> for NextState {
    type Error = StateTransitionError;

    fn try_from(value: (SearchState, &SearchEvent)) -> Result<Self, Self::Error> {
        let (current, event) = value;

        match (current, event) {
            (SearchState::Idle, SearchEvent::Start(_)) => Ok(Self(SearchState::Searching)),
            (SearchState::Searching, SearchEvent::Succeeded) => Ok(Self(SearchState::Succeeded)),
            (SearchState::Searching, SearchEvent::Failed(_)) => Ok(Self(SearchState::Failed)),
            (SearchState::Succeeded | SearchState::Failed, SearchEvent::Reset) => {
                Ok(Self(SearchState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current,
                event: event.clone(),
            }),
        }
    }
}

/// Lifecycle of the single primary search slot.
#[derive(Debug)]
pub struct SearchMachine {
    state: SearchState,
    in_flight: Option<SearchRequest>,
}

impl SearchMachine {
    pub const fn new() -> Self {
        Self {
            state: SearchState::Idle,
            in_flight: None,
        }
    }

    pub const fn state(&self) -> SearchState {
        self.state
    }

    pub const fn in_flight(&self) -> Option<&SearchRequest> {
        self.in_flight.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.state == SearchState::Searching
    }

    pub fn process_event(&mut self, event: &SearchEvent) -> Result<(), StateTransitionError> {
        let next = NextState::try_from((self.state, event))?;
        self.state = next.0;

        match event {
            SearchEvent::Start(request) => self.in_flight = Some(request.clone()),
            SearchEvent::Reset => self.in_flight = None,
            SearchEvent::Succeeded | SearchEvent::Failed(_) => {}
        }
        Ok(())
    }

    /// Record a completion and return to Idle.
    pub fn finish(&mut self, outcome: SearchEvent) -> Result<(), StateTransitionError> {
        self.process_event(&outcome)?;
        self.process_event(&SearchEvent::Reset)
    }
}

impl Default for SearchMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Search box contents: `keyword`, `keyword @GB` or `a, b, c @GB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub keywords: Vec<String>,
    pub geo: Option<String>,
}

impl ParsedInput {
    pub fn parse(text: &str) -> Self {
        let (terms, geo) = match text.rsplit_once('@') {
            Some((terms, geo)) if !normalize_geo(geo).is_empty() => {
                (terms, Some(normalize_geo(geo)))
            }
            _ => (text, None),
        };

        let keywords = terms
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect();

        Self { keywords, geo }
    }

    /// Text handed to the suggestions endpoint.
    pub fn suggestion_term(&self) -> Option<&str> {
        match self.keywords.as_slice() {
            [single] => Some(single.as_str()),
            _ => None,
        }
    }

    pub fn into_request(self, geo: &str, timeframe: &str) -> Result<SearchRequest, TrendsError> {
        if self.keywords.len() > 1 {
            return CompareQuery::new(&self.keywords, geo, timeframe).map(SearchRequest::Compare);
        }

        let keyword = self.keywords.first().map_or("", String::as_str);
        TrendsQuery::new(keyword, geo, timeframe).map(SearchRequest::Keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_TIMEFRAME;

    fn request(keyword: &str) -> SearchRequest {
        SearchRequest::Keyword(TrendsQuery::new(keyword, "", DEFAULT_TIMEFRAME).unwrap())
    }

    #[test]
    fn second_start_is_rejected_while_searching() {
        let mut machine = SearchMachine::new();
        machine.process_event(&SearchEvent::Start(request("a"))).unwrap();

        let err = machine
            .process_event(&SearchEvent::Start(request("b")))
            .unwrap_err();
        assert_eq!(err.from, SearchState::Searching);
        assert_eq!(machine.in_flight(), Some(&request("a")));
    }

    #[test]
    fn finish_returns_to_idle() {
        let mut machine = SearchMachine::new();
        machine.process_event(&SearchEvent::Start(request("a"))).unwrap();
        machine.finish(SearchEvent::Failed("boom".to_string())).unwrap();

        assert_eq!(machine.state(), SearchState::Idle);
        assert!(machine.in_flight().is_none());
        assert!(machine.finish(SearchEvent::Succeeded).is_err());
    }

    #[test]
    fn input_parsing() {
        assert_eq!(
            ParsedInput::parse("  climate change "),
            ParsedInput {
                keywords: vec!["climate change".to_string()],
                geo: None
            }
        );
        assert_eq!(
            ParsedInput::parse("rust, go @de"),
            ParsedInput {
                keywords: vec!["rust".to_string(), "go".to_string()],
                geo: Some("DE".to_string())
            }
        );
        assert_eq!(ParsedInput::parse("me@example").geo, None);
        assert_eq!(ParsedInput::parse("ai @zz").geo, None);
        assert_eq!(ParsedInput::parse("rust, go").suggestion_term(), None);
    }

    #[test]
    fn requests_from_input() {
        let single = ParsedInput::parse("ai").into_request("US", "").unwrap();
        assert!(matches!(single, SearchRequest::Keyword(ref q) if q.geo() == "US"));

        let compare = ParsedInput::parse("a, b").into_request("", "").unwrap();
        assert!(matches!(compare, SearchRequest::Compare(_)));

        let err = ParsedInput::parse("   ").into_request("", "").unwrap_err();
        assert!(matches!(err, TrendsError::Validation { field: "keyword", .. }));
    }
}
