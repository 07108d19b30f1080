pub mod data;
pub mod mapper;
pub mod sequences;
pub(crate) mod utils;
pub mod variant;
