//! Request header identities
//!
//! A header identity file lists one header mapping per line. The pool loads
//! them once at startup and hands a random one to each page job, so the batch
//! presents varying client identities to remote servers.

mod parser;
mod pool;

pub use parser::parse_header_line;
pub use pool::{parse_header_source, HeaderPool, HeaderSet};
