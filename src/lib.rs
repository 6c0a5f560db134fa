pub mod config;
pub mod exception;
pub mod fs;
pub mod param;
pub mod request;
pub mod response;
pub mod server;

pub use config::{Args, Config};
pub use exception::Exception;
pub use fs::{FileSystem, LocalFileSystem};
pub use param::{Endpoint, HttpEncoding, HttpStatus};
pub use request::Request;
pub use response::Response;
