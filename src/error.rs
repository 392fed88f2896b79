//! Unified error type.

use std::fmt;

use http::HeaderName;

/// The error returned when caller-supplied headers collide with a header
/// tether manages itself.
///
/// Handler and interceptor failures are expressed as [`MethodError`] values
/// flowing back through the chain, not as this type. `ReservedHeaderError`
/// surfaces exactly one condition: user code tried to set a reserved HTTP
/// header. It is raised before any network activity and is always
/// recoverable — drop the offending header and retry.
///
/// [`MethodError`]: crate::MethodError
#[derive(Debug)]
pub struct ReservedHeaderError {
    name: HeaderName,
}

impl ReservedHeaderError {
    pub(crate) fn new(name: HeaderName) -> Self {
        Self { name }
    }

    /// The header name that was rejected.
    pub fn name(&self) -> &HeaderName {
        &self.name
    }
}

impl fmt::Display for ReservedHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "header `{}` is managed by tether and cannot be set", self.name)
    }
}

impl std::error::Error for ReservedHeaderError {}
