//! Command-line front end for the phytosanitary records system

pub mod cli;
pub mod consola;

pub use cli::{Args, Comando, Entidad};
pub use consola::Consola;
