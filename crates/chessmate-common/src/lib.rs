pub mod errors;
pub mod id;

pub use errors::{ChessmateError, ConfigError, RelayError};
pub use id::{new_id, ConnectionId};

pub type Result<T> = std::result::Result<T, ChessmateError>;
