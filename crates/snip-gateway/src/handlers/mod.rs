mod health;
mod url;

pub use health::health_handler;
pub use url::{method_not_allowed, redirect_handler, shorten_handler};
