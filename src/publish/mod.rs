//! Draft → pull request → merge → cleanup publish flow
//!
//! Each stage is a method on [`crate::site::Site`] that can be called on its
//! own; [`crate::site::Site::save`] and [`crate::site::Site::publish`] chain them
//! in series and stop at the first error. An aborted chain leaves the
//! repository (and the [`PublishState`]) at the last successful stage.

mod events;
mod state;
mod workflow;

pub use events::{ChannelEvents, NoopEvents, Notification, SiteEvent, SiteEvents, Stage};
pub use state::PublishState;
pub use workflow::{SaveMode, SaveOptions};
