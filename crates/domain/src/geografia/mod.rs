//! Departamento → municipio → vereda hierarchy

mod entity;
mod repository;

pub use entity::{Departamento, Municipio, Vereda};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockDepartamentoRepository, MockMunicipioRepository, MockVeredaRepository};
pub use repository::{DepartamentoRepository, MunicipioRepository, VeredaRepository};
