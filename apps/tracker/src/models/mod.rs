pub mod application;
pub mod form;
pub mod stats;

pub use application::{Application, Status};
pub use form::{ApplicationForm, ApplicationPayload, FieldErrors, FormField, ResumeFile};
pub use stats::{StatsSummary, StatusCounts};
