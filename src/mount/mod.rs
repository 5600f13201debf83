//! Mount request assembly.
//!
//! A [`MountContext`] carries the options of one mount operation, built by
//! overlaying caller-supplied [`MountOptions`] on the server defaults from
//! [`MountConfig`](crate::config::MountConfig), plus a [`Recorder`] holding a
//! human-readable trace of what the operation did.

mod context;
mod options;
mod recorder;

pub use context::MountContext;
pub use options::{CommonOptions, MountOptions, TtlAction, mount_defaults};
pub use recorder::Recorder;
