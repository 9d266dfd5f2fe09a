//! Synthetic monthly crime-count generation.
//!
//! Each city follows a noisy linear trend:
//!
//! `value[i] = base + i * step + U{-noise, ..., noise}` for `i in 0..len`
//!
//! All cities draw from one `StdRng` seeded once, in the configured city order,
//! so the whole dataset is reproducible from `(seed, profiles)`.

use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::{CityProfile, TimeSeries};
use crate::error::GenerationError;

/// Check a single profile for values the generator cannot use.
pub fn validate_profile(profile: &CityProfile) -> Result<(), GenerationError> {
    if profile.name.trim().is_empty() {
        return Err(GenerationError::EmptyName);
    }
    if profile.noise < 0 {
        return Err(GenerationError::NegativeNoise {
            city: profile.name.clone(),
            noise: profile.noise,
        });
    }
    if !(profile.base.is_finite() && profile.step.is_finite()) {
        return Err(GenerationError::NonFinite {
            city: profile.name.clone(),
        });
    }
    Ok(())
}

/// Generate one city's series, advancing `rng`.
///
/// A zero noise bound consumes no random draws.
pub fn generate_series<R: Rng + ?Sized>(
    profile: &CityProfile,
    rng: &mut R,
    len: usize,
) -> Result<TimeSeries, GenerationError> {
    validate_profile(profile)?;
    if len == 0 {
        return Err(GenerationError::ZeroLength);
    }

    let values = (0..len)
        .map(|i| {
            let noise = if profile.noise == 0 {
                0
            } else {
                rng.gen_range(-profile.noise..=profile.noise)
            };
            profile.base + i as f64 * profile.step + noise as f64
        })
        .collect();

    Ok(TimeSeries {
        city: profile.name.clone(),
        values,
    })
}

/// Generate every city's series from a single generator seeded with `seed`.
///
/// Profiles are validated up front so that an invalid city aborts the run
/// before any random state is consumed.
pub fn generate_all(
    profiles: &[CityProfile],
    seed: u64,
    len: usize,
) -> Result<Vec<TimeSeries>, GenerationError> {
    let mut seen = HashSet::new();
    for profile in profiles {
        validate_profile(profile)?;
        if !seen.insert(profile.name.as_str()) {
            return Err(GenerationError::DuplicateCity(profile.name.clone()));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let series = generate_series(profile, &mut rng, len)?;
        log::debug!(
            "generated {} observations for {} (first={:.1}, last={:.1})",
            series.len(),
            series.city,
            series.values.first().copied().unwrap_or_default(),
            series.values.last().copied().unwrap_or_default(),
        );
        out.push(series);
    }
    Ok(out)
}
