//! Path patterns and the ordered route table.
//!
//! Resource paths overlap: `/get-patient/:id/glucose` extends
//! `/get-patient/:id`. The table is therefore an ordered list tested
//! most-specific-first, and the first match wins.

use axum::http::Method;

use crate::error::{RestError, RestResult};

/// Path of the patient resource.
pub const PATIENT_PATH: &str = "/get-patient/:id";

/// Path of the glucose observations for a patient.
pub const GLUCOSE_PATH: &str = "/get-patient/:id/glucose";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path pattern such as `/get-patient/:id`.
///
/// A `:name` segment matches exactly one non-empty path segment. Everything
/// else must match literally, and the segment counts must be equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: &'static str,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a pattern.
    pub fn new(source: &'static str) -> Self {
        let segments = source
            .trim_start_matches('/')
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self { source, segments }
    }

    /// The pattern text.
    pub fn as_str(&self) -> &'static str {
        self.source
    }

    /// Matches `path`, returning the captured parameters in order.
    pub fn captures(&self, path: &str) -> Option<Vec<(&str, String)>> {
        let parts: Vec<&str> = path.strip_prefix('/')?.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.push((name.as_str(), part.to_string()));
                }
                _ => return None,
            }
        }
        Some(params)
    }

    /// Matches `path` and returns the named parameter.
    pub fn capture(&self, path: &str, name: &str) -> Option<String> {
        self.captures(path)?
            .into_iter()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| value)
    }
}

/// The resource a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRoute {
    /// `GET /get-patient/:id/glucose`
    Glucose,
    /// `GET /get-patient/:id`
    Patient,
}

/// Outcome of matching a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteState {
    /// No pattern matched.
    Unmatched,
    /// The patient pattern matched.
    MatchedPatient {
        /// Requested patient id.
        id: String,
    },
    /// The glucose pattern matched.
    MatchedGlucose {
        /// Requested patient id.
        id: String,
    },
}

impl RouteState {
    /// The requested patient id, if any pattern matched.
    pub fn patient_id(&self) -> Option<&str> {
        match self {
            RouteState::Unmatched => None,
            RouteState::MatchedPatient { id } | RouteState::MatchedGlucose { id } => Some(id),
        }
    }
}

/// Ordered `(pattern, route)` pairs.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(PathPattern, ResourceRoute)>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            (PathPattern::new(GLUCOSE_PATH), ResourceRoute::Glucose),
            (PathPattern::new(PATIENT_PATH), ResourceRoute::Patient),
        ])
    }
}

impl RouteTable {
    /// Creates a table tested in the given order.
    pub fn new(routes: Vec<(PathPattern, ResourceRoute)>) -> Self {
        Self { routes }
    }

    /// Patterns in test order.
    pub fn patterns(&self) -> impl Iterator<Item = &PathPattern> {
        self.routes.iter().map(|(pattern, _)| pattern)
    }

    /// Matches `path` against each pattern in order.
    pub fn match_path(&self, path: &str) -> RouteState {
        for (pattern, route) in &self.routes {
            if let Some(id) = pattern.capture(path, "id") {
                return match route {
                    ResourceRoute::Glucose => RouteState::MatchedGlucose { id },
                    ResourceRoute::Patient => RouteState::MatchedPatient { id },
                };
            }
        }
        RouteState::Unmatched
    }

    /// Resolves a request to a matched route.
    ///
    /// # Errors
    ///
    /// [`RestError::InvalidRequest`] when the method is not `GET` or no
    /// pattern matches.
    pub fn resolve(&self, method: &Method, path: &str) -> RestResult<RouteState> {
        if method != Method::GET {
            return Err(RestError::InvalidRequest);
        }
        match self.match_path(path) {
            RouteState::Unmatched => Err(RestError::InvalidRequest),
            matched => Ok(matched),
        }
    }
}
