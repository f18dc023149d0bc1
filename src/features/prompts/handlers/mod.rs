pub mod prompt_handler;

pub use prompt_handler::{create_prompt, get_prompt_by_slug, list_prompts};
