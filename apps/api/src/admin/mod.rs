// Admin dashboard: filtering, pagination and selection run over the complete
// resume list rather than the record service's paginated list.

pub mod filter;
pub mod handlers;

pub use filter::{AdminFilter, AdminPage};
