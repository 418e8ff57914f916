//! Identity gateway adapters.

mod dto;
mod firebase;
mod in_memory;

pub use firebase::FirebaseIdentityClient;
pub use in_memory::InMemoryIdentityGateway;
