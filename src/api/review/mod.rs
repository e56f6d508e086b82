pub mod handlers;
pub mod render;
pub mod routes;

pub use routes::routes;
