//! Traits shared by report producers.

use super::ReportError;

/// Trait for checking a request before any work is done.
pub trait Validator {
    fn validate(&self) -> Result<(), ReportError>;
}

/// Trait for report generators.
pub trait Generator<Req> {
    type Output;

    /// Generate a report from the request.
    fn generate(&self, request: Req) -> Result<Self::Output, ReportError>;
}
