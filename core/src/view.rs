//! Render model for the search screen.
//!
//! `Screen::view` flattens the state into exactly what the host draws: the
//! search bar, a spinner, an error banner, one row per article, and the
//! empty-list placeholder.

use crate::screen::{Screen, ScreenStatus};
use crate::types::Article;

pub const SEARCH_PLACEHOLDER: &str = "Search for news...";
pub const EMPTY_LIST_MESSAGE: &str = "No articles found.";

/// One list row. `key` is unique within a view because it embeds the
/// position; the provider supplies no stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl ArticleRow {
    fn new(index: usize, article: &Article) -> Self {
        Self {
            key: format!("{}-{index}", article.title),
            title: article.title.clone(),
            description: article.description.clone(),
            image_url: article.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub query: String,
    pub placeholder: &'static str,
    pub show_spinner: bool,
    pub error_banner: Option<String>,
    pub rows: Vec<ArticleRow>,
    /// Set when the list is empty and nothing is loading.
    pub empty_message: Option<&'static str>,
}

impl Screen {
    pub fn view(&self) -> ScreenView {
        let loading = *self.status() == ScreenStatus::Loading;
        let rows: Vec<ArticleRow> = self
            .articles()
            .iter()
            .enumerate()
            .map(|(i, a)| ArticleRow::new(i, a))
            .collect();
        let empty_message = (rows.is_empty() && !loading).then_some(EMPTY_LIST_MESSAGE);

        ScreenView {
            query: self.query().to_string(),
            placeholder: SEARCH_PLACEHOLDER,
            show_spinner: loading,
            error_banner: self.error_message().map(str::to_string),
            rows,
            empty_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::screen::SEARCH_FAILED_MESSAGE;
    use crate::types::Source;

    fn article(title: &str, image: Option<&str>) -> Article {
        Article {
            source: Source {
                id: Some("wired".to_string()),
                name: "Wired".to_string(),
            },
            author: None,
            title: title.to_string(),
            description: Some(format!("about {title}")),
            url: "https://example.com".to_string(),
            image_url: image.map(str::to_string),
            published_at: "2024-05-01T10:00:00Z".to_string(),
            content: None,
        }
    }

    #[test]
    fn fresh_screen_shows_empty_message() {
        let view = Screen::new().view();
        assert_eq!(view.placeholder, SEARCH_PLACEHOLDER);
        assert_eq!(view.empty_message, Some(EMPTY_LIST_MESSAGE));
        assert!(!view.show_spinner);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn loading_hides_empty_message() {
        let mut screen = Screen::new();
        screen.mount();
        let view = screen.view();
        assert!(view.show_spinner);
        assert_eq!(view.empty_message, None);
    }

    #[test]
    fn empty_provider_response_shows_empty_message() {
        let mut screen = Screen::new();
        let pending = screen.mount();
        screen.complete(pending.token, Ok(Vec::new()));
        assert_eq!(screen.view().empty_message, Some(EMPTY_LIST_MESSAGE));
    }

    #[test]
    fn duplicate_titles_get_distinct_keys() {
        let mut screen = Screen::new();
        let pending = screen.mount();
        screen.complete(
            pending.token,
            Ok(vec![
                article("Same", Some("https://example.com/a.jpg")),
                article("Same", None),
            ]),
        );
        let view = screen.view();
        let keys: Vec<&str> = view.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Same-0", "Same-1"]);
        assert_eq!(view.rows[0].image_url.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(view.rows[1].image_url, None);
        assert_eq!(view.rows[1].description.as_deref(), Some("about Same"));
    }

    #[test]
    fn error_banner_shows_over_stale_rows() {
        let mut screen = Screen::new();
        let pending = screen.mount();
        screen.complete(pending.token, Ok(vec![article("kept", None)]));
        screen.set_query("bitcoin");
        let search = screen.submit_search().unwrap();
        screen.complete(search.token, Err(ApiError::Transport("offline".to_string())));

        let view = screen.view();
        assert_eq!(view.query, "bitcoin");
        assert_eq!(view.error_banner.as_deref(), Some(SEARCH_FAILED_MESSAGE));
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.empty_message, None);
    }
}
