use serde::{Deserialize, Serialize};

/// Reference to a related record by id.
///
/// Reads fill `etiqueta` with a display value taken from the joined row (a
/// name or an ICA code); writes only look at `id`. Related records are never
/// loaded deeper than this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referencia {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etiqueta: Option<String>,
}

impl Referencia {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            etiqueta: None,
        }
    }

    pub fn con_etiqueta(id: impl Into<String>, etiqueta: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            etiqueta: Some(etiqueta.into()),
        }
    }

    /// Builds a reference from a nullable foreign key column and its joined label.
    pub fn from_columns(id: Option<String>, etiqueta: Option<String>) -> Option<Self> {
        id.map(|id| Self { id, etiqueta })
    }
}

/// Id of an optional reference, as bound into a foreign key column.
pub fn ref_id(referencia: &Option<Referencia>) -> Option<&str> {
    referencia.as_ref().map(|r| r.id.as_str())
}
