use scraper::{Html, Selector};

use crate::models::Title;

/// Structured view of one watchlist page
#[derive(Debug, Default, PartialEq)]
pub struct ExtractedPage {
    /// Titles in page order, duplicates included
    pub titles: Vec<Title>,
    /// Whether the page carries a next-page navigation link
    pub has_next_page: bool,
}

impl ExtractedPage {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Pulls movie titles out of one page of watchlist markup.
///
/// Each movie entry is a `div.film-poster` whose nested `img` carries the
/// display title in its `alt` attribute. Posters without an image or without
/// alt text contribute nothing. Pagination is signalled by an `a.next` link.
pub fn extract_page(markup: &str) -> ExtractedPage {
    let document = Html::parse_document(markup);

    let poster_selector = Selector::parse("div.film-poster").unwrap();
    let img_selector = Selector::parse("img").unwrap();
    let next_selector = Selector::parse("a.next").unwrap();

    let mut titles = Vec::new();
    for poster in document.select(&poster_selector) {
        let Some(img) = poster.select(&img_selector).next() else {
            continue;
        };
        match img.value().attr("alt") {
            Some(alt) if !alt.is_empty() => titles.push(Title::from(alt)),
            _ => {}
        }
    }

    let has_next_page = document.select(&next_selector).next().is_some();

    ExtractedPage {
        titles,
        has_next_page,
    }
}
