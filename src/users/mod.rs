use crate::state::AppState;
use axum::Router;

mod domain;
mod dto;
pub mod error;
pub mod handlers;
mod password;
mod repo;
mod repo_types;
mod services;
mod store;
#[cfg(test)]
pub(crate) mod testing;
mod validation;

pub use repo::UserRepository;
pub use services::UserService;
pub use store::PgUserStore;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
