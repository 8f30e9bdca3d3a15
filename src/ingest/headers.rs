//! Column header canonicalisation and aliasing.
//!
//! Spreadsheets exported by controllers arrive with English or French
//! headers, with or without accents, spacing and casing conventions.
//! Every header is reduced to a canonical key before lookup.

use std::fmt;

/// The four columns a cost record is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    TotalCost,
    UnitCost,
    Volume,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Date, Field::TotalCost, Field::UnitCost, Field::Volume];

    /// Canonical key, as listed in error messages.
    pub fn key(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::TotalCost => "totalcost",
            Field::UnitCost => "unitcost",
            Field::Volume => "volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

const ALIASES: &[(&str, Field)] = &[
    ("date", Field::Date),
    ("month", Field::Date),
    ("period", Field::Date),
    ("mois", Field::Date),
    ("période", Field::Date),
    ("periode", Field::Date),
    ("totalcost", Field::TotalCost),
    ("cost", Field::TotalCost),
    ("total", Field::TotalCost),
    ("coûttotal", Field::TotalCost),
    ("couttotal", Field::TotalCost),
    ("coûtstotaux", Field::TotalCost),
    ("coutstotaux", Field::TotalCost),
    ("montanttotal", Field::TotalCost),
    ("unitcost", Field::UnitCost),
    ("costperunit", Field::UnitCost),
    ("coûtunitaire", Field::UnitCost),
    ("coutunitaire", Field::UnitCost),
    ("coûtparunité", Field::UnitCost),
    ("coutparunite", Field::UnitCost),
    ("volume", Field::Volume),
    ("productionvolume", Field::Volume),
    ("volumedeproduction", Field::Volume),
    ("quantity", Field::Volume),
    ("quantité", Field::Volume),
    ("quantite", Field::Volume),
];

/// Lower-case and drop whitespace, underscores, hyphens and a leading BOM.
pub fn canonical(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve a raw header to the field it names, if any.
pub fn resolve(header: &str) -> Option<Field> {
    let key = canonical(header);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, field)| *field)
}
