use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared measurement type of a data column.
///
/// `Unknown` marks names that are not dataset columns at all (factor levels,
/// synthetic symbols). Only the three concrete types produce type-qualified
/// names such as `weight.scale`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Unknown,
    Scale,
    Ordinal,
    Nominal,
}

impl ColumnType {
    /// The concrete types, in the order identifiers are assigned to them.
    pub const CONCRETE: [ColumnType; 3] =
        [ColumnType::Scale, ColumnType::Ordinal, ColumnType::Nominal];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Unknown => "unknown",
            ColumnType::Scale => "scale",
            ColumnType::Ordinal => "ordinal",
            ColumnType::Nominal => "nominal",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ColumnType::Unknown)
    }

    /// Appends the `.type` qualifier to a bare column name.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}.{}", name, self.as_str())
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(ColumnType::Unknown),
            "scale" => Ok(ColumnType::Scale),
            "ordinal" => Ok(ColumnType::Ordinal),
            "nominal" => Ok(ColumnType::Nominal),
            _ => Err(format!(
                "Unknown column type: {}. Expected scale, ordinal, nominal or unknown",
                s
            )),
        }
    }
}
