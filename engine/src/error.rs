use thiserror::Error;

use crate::Id;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The card's role bucket cannot be derived. Indicates broken data, not user error.
    #[error("card for creature {creature_id} cannot be classified into a role category")]
    Unclassifiable { creature_id: Id },

    #[error("unknown creature: {0}")]
    UnknownCreature(Id),

    #[error("unknown template: {0}")]
    UnknownTemplate(Id),

    #[error("unknown theme: {0}")]
    UnknownTheme(Id),

    #[error("unknown trap: {0}")]
    UnknownTrap(Id),

    #[error("unknown skill challenge: {0}")]
    UnknownSkillChallenge(Id),

    #[error("unknown damage type: {0}")]
    UnknownDamageType(String),

    #[error("invalid dice expression: {0}")]
    InvalidDiceExpression(String),

    #[error("failed to parse JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML")]
    Yaml(#[from] serde_yaml::Error),
}
