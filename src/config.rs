/// Latest English Wikipedia articles dump (concatenated bzip2 streams)
pub const DUMP_URL: &str =
    "https://dumps.wikimedia.org/enwiki/latest/enwiki-latest-pages-articles-multistream.xml.bz2";

/// Default output document path
pub const OUTPUT_PATH: &str = "abstracts.xml";

/// Prefix for page URLs derived from titles
pub const WIKI_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

/// Local name of the element that delimits one record in the dump
pub const RECORD_TAG: &str = "page";

/// Paragraph delimiter in wikitext
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Root and child element names of the output document
pub const ROOT_TAG: &str = "documents";
pub const DOC_TAG: &str = "doc";

/// Spaces per nesting level in the output document
pub const OUTPUT_INDENT: usize = 2;

/// Buffer between the bzip2 decoder and the XML tokenizer
pub const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Buffer in front of the output file
pub const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// Progress update interval (tick every N pages)
pub const PROGRESS_INTERVAL: u64 = 1000;
