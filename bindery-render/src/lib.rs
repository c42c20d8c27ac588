//! # bindery-render
//!
//! Template rendering library for bindery.
//!
//! This crate renders publication pages with Askama behind the core's
//! `TemplateEngine` trait.

pub mod templates;

pub use templates::{NavTemplate, PageTemplate, Templates, TocEntry, TocTemplate};
