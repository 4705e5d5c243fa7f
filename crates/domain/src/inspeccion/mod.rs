//! Field inspections and the technical results they produce

mod entity;
mod repository;

pub use entity::{InspeccionFitosanitaria, ResultadoTecnico};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockInspeccionRepository, MockResultadoRepository};
pub use repository::{InspeccionRepository, ResultadoRepository};
