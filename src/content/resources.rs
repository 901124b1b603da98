//! Web-searched reading resources

use tracing::info;

use super::{BookToc, ContentGenerator};
use crate::agent::catalog::BOOK_TOC_SEARCHER;
use crate::error::Result;

impl ContentGenerator {
    /// Search the web for a book's table of contents
    pub async fn extract_book_toc(&self, title: &str) -> Result<BookToc> {
        let mut toc: BookToc = self.runner.run_json(&BOOK_TOC_SEARCHER, title).await?;
        toc.book = title.to_string();

        info!(book = %title, chapters = toc.table_of_contents.len(), "Found table of contents");
        Ok(toc)
    }
}
