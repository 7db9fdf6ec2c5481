//! Helper functions for the page-template layer
//!
//! Ports of the template filters the site exposes (date formatting,
//! absolute URLs, excerpt extraction). The card pipeline uses the HTML
//! helpers internally as well.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
