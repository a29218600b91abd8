//! Bearer token authentication

mod errors;
mod models;
pub mod openbao;
mod repository;
mod service;
mod token;
mod verifier;

pub use errors::*;
pub use models::*;
pub use openbao::{OpenBaoClient, OpenBaoConfig};
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
pub use verifier::*;
