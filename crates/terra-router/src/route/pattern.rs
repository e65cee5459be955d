//! Path pattern compilation
//!
//! Turns templates like `/workspaces/:namespace/:name` into an anchored
//! regular expression (for matching) plus a segment list (for building
//! concrete paths back from parameters).

use crate::error::{Result, RouterError};
use crate::route::params::RouteParams;
use regex::Regex;

/// A single segment of a path pattern
///
/// # Examples
///
/// ```
/// use terra_router::route::pattern::{classify_segment, PatternSegment};
///
/// assert_eq!(classify_segment("billing"), PatternSegment::Static("billing".into()));
/// assert_eq!(classify_segment(":name"), PatternSegment::Required("name".into()));
/// assert_eq!(classify_segment(":project?"), PatternSegment::Optional("project".into()));
/// assert_eq!(classify_segment("*path"), PatternSegment::Splat("path".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Literal text
    Static(String),
    /// `:name`
    Required(String),
    /// `:name?`
    Optional(String),
    /// `*name`, matches the rest of the path (one or more segments)
    Splat(String),
}

impl PatternSegment {
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegment::Static(_) => None,
            PatternSegment::Required(name)
            | PatternSegment::Optional(name)
            | PatternSegment::Splat(name) => Some(name),
        }
    }

    fn to_regex(&self) -> String {
        match self {
            PatternSegment::Static(text) => format!("/{}", regex::escape(text)),
            PatternSegment::Required(_) => "/([^/]+?)".to_string(),
            PatternSegment::Optional(_) => "(?:/([^/]+?))?".to_string(),
            PatternSegment::Splat(_) => "/(.+?)".to_string(),
        }
    }
}

/// Classifies one `/`-separated piece of a pattern (no validation)
pub fn classify_segment(segment: &str) -> PatternSegment {
    if let Some(name) = segment.strip_prefix('*') {
        return PatternSegment::Splat(name.to_string());
    }

    match segment.strip_prefix(':') {
        Some(param) => match param.strip_suffix('?') {
            Some(name) => PatternSegment::Optional(name.to_string()),
            None => PatternSegment::Required(param.to_string()),
        },
        None => PatternSegment::Static(segment.to_string()),
    }
}

fn is_valid_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A compiled path pattern
///
/// Matching is anchored at both ends, tolerates one trailing slash and is
/// case-insensitive unless compiled otherwise.
///
/// # Examples
///
/// ```
/// use terra_router::route::pattern::PathPattern;
/// use terra_router::RouteParams;
///
/// let pattern = PathPattern::compile("/workspaces/:namespace/:name", true).unwrap();
/// assert_eq!(pattern.param_names(), ["namespace", "name"]);
///
/// let captures = pattern.captures("/workspaces/ns1/ws1").unwrap();
/// assert_eq!(captures, vec![Some("ns1".to_string()), Some("ws1".to_string())]);
///
/// let params = RouteParams::from([("namespace", "ns1"), ("name", "ws1")]);
/// assert_eq!(pattern.build(&params).unwrap(), "/workspaces/ns1/ws1");
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
    param_names: Vec<String>,
    regex: Regex,
}

impl PathPattern {
    /// Compiles `pattern`, rejecting malformed parameter segments
    pub fn compile(pattern: &str, case_insensitive: bool) -> Result<Self> {
        let invalid = |reason: String| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'".to_string()));
        }

        let segments: Vec<PatternSegment> = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(classify_segment)
            .collect();

        let mut param_names: Vec<String> = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            let Some(name) = segment.param_name() else {
                continue;
            };
            if !is_valid_param_name(name) {
                return Err(invalid(format!("invalid parameter name '{}'", name)));
            }
            if param_names.iter().any(|n| n == name) {
                return Err(invalid(format!("duplicate parameter '{}'", name)));
            }
            if matches!(segment, PatternSegment::Splat(_)) && idx + 1 != segments.len() {
                return Err(invalid(format!("splat '*{}' must be the last segment", name)));
            }
            param_names.push(name.to_string());
        }

        let body: String = segments.iter().map(PatternSegment::to_regex).collect();
        let flags = if case_insensitive { "(?i)" } else { "" };
        let regex = Regex::new(&format!("{}^{}/?$", flags, body))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            segments,
            param_names,
            regex,
        })
    }

    /// The pattern text as defined
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parameter names in declaration order
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn is_match(&self, pathname: &str) -> bool {
        self.regex.is_match(pathname)
    }

    /// Raw capture groups, one per parameter, in declaration order
    ///
    /// Optional parameters that did not participate are `None`.
    pub fn captures(&self, pathname: &str) -> Option<Vec<Option<String>>> {
        let caps = self.regex.captures(pathname)?;
        Some(
            (1..caps.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Builds a concrete pathname, percent-encoding parameter values
    ///
    /// Splat values keep their `/` separators. Missing optional parameters
    /// drop their segment; missing required ones are an error.
    pub fn build(&self, params: &RouteParams) -> Result<String> {
        let required = |name: &str| {
            params
                .get(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RouterError::MissingParam {
                    pattern: self.source.clone(),
                    param: name.to_string(),
                })
        };

        let parts = self
            .segments
            .iter()
            .map(|segment| -> Result<Option<String>> {
                Ok(match segment {
                    PatternSegment::Static(text) => Some(text.clone()),
                    PatternSegment::Required(name) => {
                        Some(urlencoding::encode(required(name)?).into_owned())
                    }
                    PatternSegment::Optional(name) => params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .map(|v| urlencoding::encode(v).into_owned()),
                    PatternSegment::Splat(name) => Some(
                        required(name)?
                            .split('/')
                            .map(|part| urlencoding::encode(part).into_owned())
                            .collect::<Vec<_>>()
                            .join("/"),
                    ),
                })
            })
            .collect::<Result<Vec<Option<String>>>>()?;

        let path: Vec<String> = parts.into_iter().flatten().collect();
        Ok(format!("/{}", path.join("/")))
    }
}
