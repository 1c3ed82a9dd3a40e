//! Link ingestion and decoding

pub mod explodes;
pub mod remark;
pub mod subparser;

pub use explodes::{explode, DecodeError, Decoded};
pub use remark::resolve_remark;
pub use subparser::{extract_links, split_records};
