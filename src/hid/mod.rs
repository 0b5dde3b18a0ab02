//! HID protocol layer - report descriptor, state and wire codecs.

pub mod descriptor;
pub mod dial;
pub mod haptic;

pub use descriptor::{
    DIAL_REPORT_DESCRIPTOR, HAPTIC_FEEDBACK_REPORT_ID, RADIAL_CONTROLLER_REPORT_ID,
};
pub use dial::{DialState, RadialReport};
pub use haptic::{HapticCommand, HapticFeatureReport};
