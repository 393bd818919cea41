pub mod client;
pub mod decode;
pub mod limiter;
pub mod prompts;

pub use client::*;
pub use decode::*;
pub use limiter::*;
pub use prompts::*;
