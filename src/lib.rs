//! Ukrainian named-entity highlighting: NER adapters, span highlighting and
//! the web form serving them.

pub mod api;
pub mod cli;
pub mod config;
pub mod highlight;
pub mod logging;
pub mod ner;
pub mod ui;
