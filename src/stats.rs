/// Counters collected during a single extraction run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub pages_scanned: u64,
    pub abstracts_written: u64,
    pub empty_abstracts: u64,
    pub duplicate_titles: u64,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_pages(&mut self) {
        self.pages_scanned += 1;
    }

    pub fn inc_written(&mut self) {
        self.abstracts_written += 1;
    }

    pub fn inc_empty(&mut self) {
        self.empty_abstracts += 1;
    }

    pub fn inc_duplicates(&mut self) {
        self.duplicate_titles += 1;
    }

    pub fn pages(&self) -> u64 {
        self.pages_scanned
    }

    pub fn written(&self) -> u64 {
        self.abstracts_written
    }

    pub fn empty(&self) -> u64 {
        self.empty_abstracts
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicate_titles
    }

    /// Every scanned page is either written, empty, or a duplicate.
    pub fn is_consistent(&self) -> bool {
        self.abstracts_written + self.empty_abstracts + self.duplicate_titles == self.pages_scanned
    }
}
