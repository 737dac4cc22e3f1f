pub mod assembler;
pub mod context;
pub mod engine;
pub mod registry;
pub mod safety;
pub mod trust;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
