//! Wikiabstracts: first-paragraph abstracts from a Wikipedia dump
//!
//! A single streaming pass turns a bzip2-compressed MediaWiki XML dump into a flat
//! `<documents>` XML file with one `<doc>` (title, URL, abstract) per page:
//!
//! 1. **Fetch** -- blocking HTTP GET of the dump; anything but `200 OK` aborts
//! 2. **Decompress** -- every bzip2 member of the (multistream) dump, pulled on demand
//! 3. **Scan** -- `<page>` elements decoded one at a time from the token stream
//! 4. **Extract** -- text before the first blank line, trimmed; empty pages are dropped
//! 5. **Write** -- each `<doc>` appended as soon as it is produced, root closed once
//!
//! Nothing is held in memory beyond the page currently being decoded, and every
//! failure aborts the run with an [`error::ExtractError`].
//!
//! # Key Modules
//!
//! - [`fetch`] -- HTTP download of the dump
//! - [`parser`] -- bzip2 decompression and streaming `<page>` scanner
//! - [`content`] -- Abstract extraction and URL derivation
//! - [`writer`] -- Output document serialization
//! - [`extract`] -- Pipeline driver
//! - [`models`] -- Core data types (RawPage, Summary)
//! - [`stats`] -- Per-run counters
//! - [`error`] -- Error taxonomy
//! - [`config`] -- Constants
//!
//! # Example Usage
//!
//! ```bash
//! # Download the latest English dump and write abstracts.xml
//! wikiabstracts
//!
//! # Use an already-downloaded dump, first 10k pages only
//! wikiabstracts --input enwiki-latest-pages-articles-multistream.xml.bz2 --limit 10000 -v
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod parser;
pub mod stats;
pub mod writer;
