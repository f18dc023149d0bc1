//! Prompt catalog feature: prompt assets submitted by creators and browsed
//! by visitors.
//!
//! Records are created once through the submission flow and never updated
//! or deleted. Slugs are derived from titles without a uniqueness check;
//! lookups resolve collisions by newest `created_at`.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/prompts` | Submit a prompt asset (multipart) |
//! | GET | `/api/prompts` | List all prompts, newest first |
//! | GET | `/api/prompts/{slug}` | Newest prompt with the given slug |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PromptService;
