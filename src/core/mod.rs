//! Session handling and the service layer the presentation shell calls into.

pub mod services;
pub mod session;
pub mod tracker;

pub use session::Session;
pub use tracker::ExpenseTracker;
