pub mod cache;
pub mod handlers;
pub mod middleware;
pub mod providers;
pub mod resolve;
pub mod routes;

pub use routes::create_router;
