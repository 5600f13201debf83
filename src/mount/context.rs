use std::fmt;

use crate::config::MountConfig;

use super::options::{MountOptions, mount_defaults};
use super::recorder::Recorder;

/// Options and trace of a single mount operation.
#[derive(Debug, Clone)]
pub struct MountContext {
    options: MountOptions,
    recorder: Recorder,
}

impl MountContext {
    /// Wrap `options` as-is, with a fresh enabled recorder.
    pub fn create(options: MountOptions) -> Self {
        Self { options, recorder: Recorder::create() }
    }

    /// Overlay caller `options` on the server defaults.
    pub fn merge_from(options: &MountOptions, defaults: &MountConfig) -> Self {
        let mut merged = mount_defaults(defaults);
        merged.merge_from(options);
        Self::create(merged)
    }

    /// Context holding only the server defaults.
    pub fn defaults(defaults: &MountConfig) -> Self {
        Self::create(mount_defaults(defaults))
    }

    pub fn options(&self) -> &MountOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut MountOptions {
        &mut self.options
    }

    pub fn record(&mut self, message: impl Into<String>) {
        self.recorder.record(message);
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn into_parts(self) -> (MountOptions, Recorder) {
        (self.options, self.recorder)
    }
}

impl fmt::Display for MountContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MountContext{{options={}}}", self.options)
    }
}
