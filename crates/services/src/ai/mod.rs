mod client;
mod questions;
mod tools;

pub use client::{AiClient, AiConfig};
pub use tools::{
    ASSISTANT_EMPTY, ASSISTANT_FALLBACK, IMAGE_EMPTY, IMAGE_READ_FALLBACK, WritingCheck,
};
