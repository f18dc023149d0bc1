mod prompt;

pub use prompt::Prompt;
