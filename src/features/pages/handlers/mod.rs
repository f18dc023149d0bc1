pub mod page_handler;

pub use page_handler::{dashboard_page, home_page, prompt_detail_page, submit_dashboard, PageState};
