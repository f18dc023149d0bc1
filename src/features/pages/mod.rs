//! Server-rendered pages: the public catalog, prompt detail views and the
//! creator dashboard.
//!
//! Pages share the service layer with the JSON API but have their own
//! failure behavior: a broken backend degrades the catalog to its empty
//! state and surfaces submission failures as form banners, not as API
//! error envelopes.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Public catalog of verified prompts |
//! | GET | `/prompts/{slug}` | Prompt detail page |
//! | GET | `/dashboard` | Creator dashboard with the submission form |
//! | POST | `/dashboard` | Submit the dashboard form |

pub mod handlers;
pub mod routes;
pub mod templates;
pub mod views;
