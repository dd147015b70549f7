mod fixed_point;
mod helpers;

pub mod op;
mod secret;

pub use fixed_point::{FixedPoint, FixedPointConversionError, FIXED_POINT_MAX_DIGITS, FIXED_POINT_SCALE};
pub use helpers::parse_boolean_flag;
pub use secret::Secret;
