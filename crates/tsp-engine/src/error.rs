//! Error kinds produced by the cutting-plane engine.
//!
//! Propagation policy (spec §7): everything except [`EngineError::Separator`]
//! and [`EngineError::ConfigDisabled`] is meant to abort the current
//! top-level operation (a pivot round or a branch-and-cut step); those two
//! are recoverable by the caller, which drops the offending queue/feature and
//! continues.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("LP oracle call to `{routine}` failed with code {code}")]
    LpFailure { routine: &'static str, code: i32 },

    #[error("LP became infeasible in `{routine}`")]
    LpInfeas { routine: &'static str },

    #[error("invariant broken: {0}")]
    InvariantBroken(String),

    #[error("separator `{name}` failed: {reason}")]
    Separator { name: &'static str, reason: String },

    #[error("pricer failed: {0}")]
    Pricer(String),

    #[error("branch executor failed: {0}")]
    Branch(String),

    #[error("feature `{0}` is not enabled in this build")]
    ConfigDisabled(&'static str),
}

pub type EngineResult<T> = Result<T, EngineError>;
