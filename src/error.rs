//! Setup errors raised before a match starts

use crate::config::ConfigError;
use crate::game::Side;

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("throw animation for {0:?} has no release timing event")]
    MissingReleaseTiming(Side),

    #[error("release timing {release_at}s for {side:?} is outside its {duration}s throw animation")]
    InvalidReleaseTiming {
        side: Side,
        release_at: f32,
        duration: f32,
    },
}
