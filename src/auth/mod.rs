pub mod envelope;
pub mod revocation;

pub use envelope::{ResponseBuilder, ResultEnvelope, StatusTitle};
