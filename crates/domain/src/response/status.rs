//! Accepted status codes for an exchange.

use super::StatusCode;

/// Expected status code value or range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: StatusCode) -> bool {
        let status = status.as_u16();
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => code.to_string(),
            Self::Range { min, max } => format!("{min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("one of [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::exact(404);
        assert!(exp.matches(StatusCode(404)));
        assert!(!exp.matches(StatusCode(200)));
    }

    #[test]
    fn test_default_is_success_range() {
        let exp = StatusExpectation::default();
        assert!(exp.matches(StatusCode(200)));
        assert!(exp.matches(StatusCode(299)));
        assert!(!exp.matches(StatusCode(300)));
        assert!(!exp.matches(StatusCode(199)));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 404]);
        assert!(exp.matches(StatusCode(404)));
        assert!(!exp.matches(StatusCode(500)));
    }

    #[test]
    fn test_description() {
        assert_eq!(StatusExpectation::success().description(), "200-299");
        assert_eq!(StatusExpectation::exact(201).description(), "201");
        assert_eq!(
            StatusExpectation::OneOf(vec![200, 204]).description(),
            "one of [200, 204]"
        );
    }
}
