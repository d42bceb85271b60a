//! CLI commands
//!
//! Command implementations for the `draftpress` binary.

mod auth;
mod clone;
mod deploy;
mod edit;
mod progress;
mod session;
mod status;
mod style;

pub use auth::{AuthAction, run_auth};
pub use clone::run_clone;
pub use deploy::run_deploy;
pub use edit::{EditArgs, run_assets, run_finish, run_publish, run_save, run_show, run_upload};
pub use session::Session;
pub use status::run_status;
