//! Human-readable descriptions derived from series identifiers

/// Description and axis label of a series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesDescription {
    /// Long description, e.g. "Desplazamiento total absoluto"
    pub description: String,
    /// Value-axis label, e.g. "Desplazamiento total (cm)"
    pub axis_label: String,
}

impl SeriesDescription {
    /// Derive the description from the identifier suffix
    ///
    /// `_TOT` marks total displacement and `_HOR` horizontal displacement;
    /// anything else is described by the identifier itself.
    pub fn from_id(id: &str) -> Self {
        let (description, axis_label) = if id.ends_with("_TOT") {
            ("Desplazamiento total absoluto", "Desplazamiento total (cm)")
        } else if id.ends_with("_HOR") {
            ("Desplazamiento horizontal absoluto", "Desplazamiento horizontal (cm)")
        } else {
            (id, "Valor")
        };
        Self {
            description: description.to_string(),
            axis_label: axis_label.to_string(),
        }
    }
}
