//! Engine-wide constants shared by the calculation core and effect handlers.

/// Width of the stacking-penalty curve.
///
/// The n-th strongest penalised modifier (0-based) is scaled by
/// `exp(-(n / STACKING_PENALTY_SPREAD)^2)`.
pub const STACKING_PENALTY_SPREAD: f64 = 2.67;

/// Resistance multiplier used when a target has no value for the effect's
/// resistance attribute.
pub const DEFAULT_REMOTE_RESIST: f64 = 1.0;

/// Group name every booster item must carry.
pub const BOOSTER_GROUP: &str = "Booster";

/// Attribute a booster's slot number is derived from.
pub const BOOSTERNESS: &str = "boosterness";

/// Lowest and highest valid booster slots.
pub const BOOSTER_SLOT_MIN: u8 = 1;
pub const BOOSTER_SLOT_MAX: u8 = 3;

pub const MAX_VELOCITY: &str = "maxVelocity";
pub const SPEED_FACTOR: &str = "speedFactor";
