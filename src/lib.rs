//! Email Classifier — sorts Portuguese emails into productive/unproductive
//! and drafts a suggested reply.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
