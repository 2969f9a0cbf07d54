pub mod filler;
pub mod submitter;

pub use filler::{fill_pages, reachable_pages, DefaultStrategy, FillOptions, FillStrategy};
pub use submitter::{check_response, Submission, SubmissionResult, SubmitOptions};
