pub mod pages;
pub mod prompts;
