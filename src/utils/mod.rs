pub mod http;
pub mod signals;

pub use http::{is_path_segment, non_empty, parse_json_body};
pub use signals::shutdown_signal;
