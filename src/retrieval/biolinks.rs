//! BioDigital gallery links: HTML extraction, embedding and search

use scraper::{Html, Selector};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::store::{Biolink, BiolinkMatch, VectorStore};
use super::Embedder;
use crate::error::{AppError, Result};

const BIODIGITAL_ORIGIN: &str = "https://human.biodigital.com";

/// Gallery card found in a saved BioDigital page
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub name: String,
    pub href: String,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Internal(format!("Invalid selector {}: {}", css, e)))
}

/// Parse `li.gallery-cards__item` cards with a button link.
///
/// Missing attributes fall back to `No Name` / `No Link`.
pub fn extract_gallery_cards(html: &str) -> Result<Vec<GalleryCard>> {
    let document = Html::parse_document(html);
    let item_selector = selector("li.gallery-cards__item")?;
    let link_selector = selector(r#"a[role="button"]"#)?;

    let cards = document
        .select(&item_selector)
        .filter_map(|item| item.select(&link_selector).next())
        .map(|link| {
            let name = link.value().attr("aria-label").unwrap_or("No Name");
            let href = link.value().attr("href").unwrap_or("No Link");
            GalleryCard {
                name: name.to_string(),
                href: format!("{}{}", BIODIGITAL_ORIGIN, href),
            }
        })
        .collect();

    Ok(cards)
}

pub struct BiolinkIndex {
    embedder: Arc<Embedder>,
    store: Arc<dyn VectorStore>,
}

impl BiolinkIndex {
    pub fn new(embedder: Arc<Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Extract cards from an HTML file, embed their names and store them
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let html = tokio::fs::read_to_string(path).await?;
        let cards = extract_gallery_cards(&html)?;

        let mut links = Vec::with_capacity(cards.len());
        for card in cards {
            let embedding = self.embedder.embed(&card.name).await?;
            links.push(Biolink {
                name: card.name,
                href: card.href,
                embedding,
            });
        }

        let inserted = self.store.insert_biolinks(&links).await?;
        info!(path = %path.display(), inserted, "Stored biolinks");
        Ok(inserted)
    }

    pub async fn search(&self, query: &str, top_n: usize) -> Result<Vec<BiolinkMatch>> {
        let vector = self.embedder.embed(query).await?;
        self.store.search_biolinks(&vector, top_n).await
    }
}
