//! Flutter bridge for notedeck core.
//!
//! Only `api` is scanned by the binding generator.

pub mod api;
