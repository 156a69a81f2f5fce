pub mod flags;
pub mod motor;

pub use flags::StatusRegister;
pub use motor::{ramp_profile, Motor};
