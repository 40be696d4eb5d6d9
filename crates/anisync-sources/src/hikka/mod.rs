pub mod client;
pub mod api;

pub use client::HikkaClient;
