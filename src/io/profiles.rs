//! City profile files.
//!
//! A profile file is a JSON array of `{ "name", "base", "step", "noise" }`
//! objects, processed in file order. Semantic validation (noise sign,
//! duplicates, ...) happens at generation time.

use std::fs::File;
use std::path::Path;

use crate::domain::CityProfile;
use crate::error::AppError;

/// Load city profiles from a JSON file.
pub fn load_profiles(path: &Path) -> Result<Vec<CityProfile>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open cities file '{}': {e}", path.display())))?;
    let profiles: Vec<CityProfile> = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid cities file '{}': {e}", path.display())))?;

    if profiles.is_empty() {
        return Err(AppError::new(2, format!("Cities file '{}' lists no cities.", path.display())));
    }
    log::info!("loaded {} city profiles from {}", profiles.len(), path.display());
    Ok(profiles)
}
