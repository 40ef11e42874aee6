// src/providers/mod.rs
//
// One module per backend. Each exposes a single `chat` that sends one
// request and returns the reply text; callers pick the module to use.

pub mod anthropic;
pub mod google;
pub mod openai;
