//! HTML template rendering handlers for the admin dashboard.

mod dashboard;
mod login;
mod payments;

pub use dashboard::dashboard_handler;
pub use login::{login_page_handler, login_submit_handler, logout_handler};
pub use payments::{proof_handler, reject_form_handler, verify_form_handler};
