pub mod cases;

pub use cases::{CaseSubmission, SaveCaseFailure, SaveCaseResponse};
