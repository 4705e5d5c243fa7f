//! Application layer - Managers and the system facade

pub mod gestores;
pub mod sistema;
pub mod validacion;

pub use sistema::{Repositorios, SistemaFitosanitario};
