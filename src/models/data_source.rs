use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of a figure shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Fabricated demo data.
    Synthetic,
    /// Primary hosted database.
    Supabase,
    /// Bank-linked data from the Open Finance integration.
    OpenFinance,
    /// Secondary real source, displayed alongside `Supabase`.
    Xp,
    /// Derived locally from other values.
    Calculated,
}

impl DataSource {
    pub fn is_real(self) -> bool {
        !matches!(self, DataSource::Synthetic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Synthetic => "synthetic",
            DataSource::Supabase => "supabase",
            DataSource::OpenFinance => "openfinance",
            DataSource::Xp => "xp",
            DataSource::Calculated => "calculated",
        }
    }

    /// Badge text for the two-bucket display.
    pub fn label(self) -> &'static str {
        match crate::provenance::collapse(self) {
            DisplaySource::Real => "Dados reais",
            DisplaySource::Synthetic => "Estimado",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-bucket projection of [`DataSource`] used by display-only consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySource {
    Real,
    Synthetic,
}

/// A value paired with exactly one provenance tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub data_source: DataSource,
}

impl<T> Sourced<T> {
    pub fn new(value: T, data_source: DataSource) -> Self {
        Self { value, data_source }
    }

    pub fn synthetic(value: T) -> Self {
        Self::new(value, DataSource::Synthetic)
    }

    pub fn is_real(&self) -> bool {
        self.data_source.is_real()
    }

    pub fn display_source(&self) -> DisplaySource {
        crate::provenance::collapse(self.data_source)
    }

    pub fn as_ref(&self) -> Sourced<&T> {
        Sourced::new(&self.value, self.data_source)
    }

    /// Transform the value, keeping its provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced::new(f(self.value), self.data_source)
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
