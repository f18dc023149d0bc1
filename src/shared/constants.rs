/// Character budget for prompt template previews on listing cards
pub const PROMPT_PREVIEW_LENGTH: usize = 120;

/// Ellipsis appended to truncated previews
pub const PREVIEW_ELLIPSIS: char = '…';
