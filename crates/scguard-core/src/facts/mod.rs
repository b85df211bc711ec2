pub mod model;
pub mod provider;
pub mod read;

pub use model::*;
pub use provider::{FactProvider, InMemoryFacts};
pub use read::{FactDocument, read_facts};

#[cfg(test)]
pub(crate) mod testing;
