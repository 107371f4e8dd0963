pub mod parse;
pub mod reply;

pub use parse::{parse_command, Command, ProtocolError};
pub use reply::{Reply, ERROR_PREFIX, SUCCESS_PREFIX};
