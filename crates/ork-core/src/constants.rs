//! Global constants for ork-core

/// Number of samples taken along a nose-cone profile
pub const NOSE_PROFILE_DIVISIONS: usize = 100;

/// Archive entry holding the rocket document inside an `.ork` zip file
pub const ROCKET_ENTRY_NAME: &str = "rocket.ork";

/// Literal token marking a field whose value is inherited from a relative
pub const AUTO_TOKEN: &str = "auto";

/// Root element of an OpenRocket document
pub const ROOT_ELEMENT: &str = "openrocket";

/// Relative tolerance used when comparing profile coordinates
pub const PROFILE_EPSILON: f64 = 1e-12;
