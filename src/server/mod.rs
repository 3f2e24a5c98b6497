pub mod builder;
pub mod handler;
pub mod listener;

pub use builder::{Listening, ServerBuilder};
pub use handler::RequestHandler;
pub use listener::ServerError;
