pub mod body;
pub mod cors;
pub mod filter;
pub mod handler;
pub mod headers;
pub mod transform;
pub mod upstream;
