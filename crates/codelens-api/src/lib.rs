pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;
pub mod state;

pub use error::*;
pub use logging::{bootstrap_subscriber, init_tracing};
pub use routes::*;
pub use server::*;
pub use state::*;
