pub mod resume;
pub mod stats;

pub use resume::{CategoryRef, ListFilter, Resume, ResumePage, ResumeSubmission};
pub use stats::ResumeStats;
