//! Per-source-type field extraction.
//!
//! Parsers never fail: anything they cannot find becomes an empty string
//! (forms, mandatory invoice keys) or is left out (emails, optional invoice
//! keys).

pub mod email;
pub mod form;
mod html;
pub mod invoice;

pub use email::{parse_email, EmailParser};
pub use form::parse_form;
pub use invoice::parse_invoice;
