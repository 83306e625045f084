pub mod client;
pub mod command;
pub mod handle;
pub mod object;

pub use client::EthersClient;
pub use object::RunSettings;
