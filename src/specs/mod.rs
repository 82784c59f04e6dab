// src/specs/mod.rs
//! # Page-reading "specs"
//!
//! Each spec knows how to read one kind of portal page and nothing else:
//! where the ground truth lives in the HTML and how to pull it out robustly.
//!
//! ## What lives here
//! - **Pure parsing** of remote pages: no networking, no state.
//! - **Tolerant extraction** through `core::html` (case-insensitive tag
//!   blocks, attribute lookup, tag stripping, entity/whitespace cleanup).
//! - Page markers (dashboard title, "please log in" text) used by the session.
//!
//! ## What does **not** live here
//! - Requests, cookies, timeouts: `session`.
//! - Deciding what is new or whom to tell: `diff`, `notify`, `poller`.
//!
//! ## Typical call chain
//! ```text
//! poller → session::fetch_report() → specs::report::parse_doc()
//!        ↘ session::login()        → specs::login::is_dashboard() / error_text()
//! ```
//!
//! ## Testing notes
//! Specs are tested offline against captured pages in `tests/fixtures/`.
pub mod login;
pub mod report;
