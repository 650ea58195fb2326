//! Choosing between real and synthetic figures and tagging the result.

use crate::models::{DataSource, DisplaySource, Sourced};

/// Surface `real` tagged with `real_source` when present, otherwise
/// `synthetic` tagged [`DataSource::Synthetic`].
pub fn resolve<T>(real: Option<T>, synthetic: T, real_source: DataSource) -> Sourced<T> {
    match real {
        Some(value) => Sourced::new(value, real_source),
        None => Sourced::synthetic(synthetic),
    }
}

/// [`resolve`] with the primary database as the real source.
pub fn resolve_default<T>(real: Option<T>, synthetic: T) -> Sourced<T> {
    resolve(real, synthetic, DataSource::Supabase)
}

/// Like [`resolve`] but builds the synthetic value only when needed.
pub fn resolve_with<T>(
    real: Option<T>,
    synthetic: impl FnOnce() -> T,
    real_source: DataSource,
) -> Sourced<T> {
    match real {
        Some(value) => Sourced::new(value, real_source),
        None => Sourced::synthetic(synthetic()),
    }
}

/// Two-bucket projection for display-only consumers.
pub fn collapse(source: DataSource) -> DisplaySource {
    match source {
        DataSource::Synthetic => DisplaySource::Synthetic,
        DataSource::Supabase
        | DataSource::Xp
        | DataSource::OpenFinance
        | DataSource::Calculated => DisplaySource::Real,
    }
}

/// Provenance of a value computed from `inputs`: synthetic if any input is
/// (or there are none), calculated otherwise.
pub fn combine(inputs: &[DataSource]) -> DataSource {
    if inputs.is_empty() || inputs.iter().any(|s| !s.is_real()) {
        DataSource::Synthetic
    } else {
        DataSource::Calculated
    }
}
