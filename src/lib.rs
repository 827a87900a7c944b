pub mod app;
pub mod auth;
pub mod colors;
pub mod config;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod models;
pub mod request;
pub mod response;
pub mod routing;
pub mod testing;

pub use app::App;
pub use config::Config;
pub use error::Error;
pub use request::Request;
pub use response::{Response, StatusCode};
pub use routing::{Method, Router};
pub use testing::TestApp;
