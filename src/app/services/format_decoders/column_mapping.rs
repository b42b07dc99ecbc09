//! Column mapping for delimited telemetry text
//!
//! Maps each canonical telemetry field to a column index. Without a header the
//! canonical positional layout is used; a header row overrides the position of
//! every field it names.

use crate::constants::{FIELD_COUNT, FIELD_NAMES};

/// Canonical telemetry fields in positional order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryField {
    VehicleId,
    Timestamp,
    Latitude,
    Longitude,
    Speed,
    Heading,
    EngineRpm,
    FuelLevel,
    OdometerKm,
    EngineTemp,
    BatteryVolt,
    DiagnosticCode,
}

impl TelemetryField {
    /// All fields in canonical order
    pub const ALL: [TelemetryField; FIELD_COUNT] = [
        Self::VehicleId,
        Self::Timestamp,
        Self::Latitude,
        Self::Longitude,
        Self::Speed,
        Self::Heading,
        Self::EngineRpm,
        Self::FuelLevel,
        Self::OdometerKm,
        Self::EngineTemp,
        Self::BatteryVolt,
        Self::DiagnosticCode,
    ];

    /// Canonical column name
    pub fn name(self) -> &'static str {
        FIELD_NAMES[self as usize]
    }

    /// Look up a field by its canonical (lowercase) name
    pub fn from_name(name: &str) -> Option<Self> {
        FIELD_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| Self::ALL[index])
    }
}

/// Column index for every canonical field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    indices: [usize; FIELD_COUNT],
    recognized: usize,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::positional()
    }
}

impl ColumnMapping {
    /// Canonical positional layout: field `i` lives in column `i`
    pub fn positional() -> Self {
        Self {
            indices: std::array::from_fn(|i| i),
            recognized: 0,
        }
    }

    /// Build a mapping from header names
    ///
    /// Names are trimmed and lower-cased before matching. Unknown names are
    /// ignored and fields the header does not mention keep their positional
    /// default.
    pub fn from_header<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut mapping = Self::positional();

        for (index, header) in headers.into_iter().enumerate() {
            let name = header.trim().to_ascii_lowercase();
            if let Some(field) = TelemetryField::from_name(&name) {
                mapping.indices[field as usize] = index;
                mapping.recognized += 1;
            }
        }

        mapping
    }

    /// Column index for a field
    pub fn index(&self, field: TelemetryField) -> usize {
        self.indices[field as usize]
    }

    /// Number of header columns that matched a canonical field
    pub fn recognized_columns(&self) -> usize {
        self.recognized
    }

    /// Select a field's slice from a split line, if the column exists
    pub fn get<'a>(&self, fields: &[&'a str], field: TelemetryField) -> Option<&'a str> {
        fields.get(self.index(field)).copied()
    }
}
