pub mod keystore;
pub mod types;
pub mod utils;
