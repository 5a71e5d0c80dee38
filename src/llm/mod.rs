pub mod client;
pub mod generate;
pub mod prompts;

pub use client::*;
pub use generate::*;
pub use prompts::*;
