pub mod cadastre;
pub mod coloring;
pub mod error;
pub mod geom;
pub mod session;
pub mod storage;
pub mod zone;

pub use error::{Result, ZonageError};
