//! Error types for world operations.

use apiary_types::BeeId;
use thiserror::Error;

/// Errors that can occur in hive operations.
#[derive(Error, Debug)]
pub enum HiveError {
    /// A timed rest was cut short by the hive halting.
    ///
    /// Not locally recoverable: the agent's loop ends. The shutdown drain
    /// still runs afterwards, so nothing is left blocked in the chamber.
    #[error("rest interrupted by hive teardown")]
    Interrupted,

    /// A claim found less than one unit of nectar or pollen.
    ///
    /// Expected control flow: the current rearing slot is skipped and the
    /// stores are left untouched.
    #[error("not enough nectar and pollen in the stores")]
    ResourcesExhausted,

    /// The chamber protocol was driven outside its contract.
    ///
    /// Summoning or dismissing from an empty chamber, summoning the same
    /// drone twice, or a drone entering twice. These are programming errors,
    /// not runtime conditions to recover from.
    #[error("queen's chamber contract violated: {0}")]
    ChamberViolation(String),

    /// A perish report named a bee the registry does not know.
    #[error("unknown bee: {0}")]
    UnknownBee(BeeId),

    /// The hive configuration failed validation.
    #[error("invalid hive configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for hive operations.
pub type HiveResult<T> = Result<T, HiveError>;
