pub mod decode;
pub mod derive;
pub mod filter;
pub mod flatten;
pub mod gamma;
pub mod models;
pub mod source;
