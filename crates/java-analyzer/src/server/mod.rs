pub(crate) mod connection;
pub(crate) mod handler;

pub use connection::{run_stdio, run_tcp};
pub use handler::RequestHandler;
