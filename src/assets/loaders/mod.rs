pub mod imdl;

pub use imdl::{ImdlLoader, ImdlWriter};
