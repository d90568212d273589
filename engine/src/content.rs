use std::collections::HashMap;

use crate::encounter::Encounter;
use crate::error::EngineError;
use crate::registry::Library;

pub const BUILTIN_LIBRARY: &str = include_str!("../content/library.yaml");

pub fn builtin_library() -> Result<Library, EngineError> {
    Library::from_yaml(BUILTIN_LIBRARY)
}

pub fn builtin_encounters() -> HashMap<&'static str, &'static str> {
    HashMap::from([(
        "goblin_ambush",
        include_str!("../content/encounters/goblin_ambush.yaml"),
    )])
}

pub fn builtin_encounter(name: &str) -> Option<Result<Encounter, EngineError>> {
    builtin_encounters()
        .get(name)
        .map(|text| serde_yaml::from_str(text).map_err(EngineError::from))
}
