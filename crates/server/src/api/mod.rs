pub mod handlers;
pub mod routes;
pub mod videos;

pub use routes::create_router;
