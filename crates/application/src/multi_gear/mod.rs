//! Running one command on every gear of an application

mod executor;
mod format;

pub use executor::{GearFailure, GearOutcome, MultiGearExecutor, MultiGearOptions, MultiGearReport};
pub use format::{OutputMode, format_gear_output};
