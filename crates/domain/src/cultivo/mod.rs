//! Crops and pests

mod entity;
mod repository;

pub use entity::{Cultivo, Plaga};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockCultivoRepository, MockPlagaRepository};
pub use repository::{CultivoRepository, PlagaRepository};
