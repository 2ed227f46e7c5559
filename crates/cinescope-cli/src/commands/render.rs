use crate::output::Output;
use cinescope_core::{AppContext, ListView, Route};
use cinescope_models::{
    format_rating, format_release_date, poster_url, CatalogEntry, SearchCandidate, SessionStatus, SuggestionItem,
    TrendingMovie, WatchlistItem,
};
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

const UNKNOWN_DATE: &str = "Unknown release date";
const OVERVIEW_WIDTH: usize = 60;

/// A record that can be shown as one table row
pub trait TableRow: Clone + Into<CatalogEntry> {
    fn header() -> &'static [&'static str];
    fn row(&self, image_base_url: &str) -> Vec<String>;
}

fn artwork(image_base_url: &str, reference: Option<&str>) -> String {
    match reference {
        Some(reference) if !reference.trim().is_empty() => poster_url(image_base_url, reference),
        _ => "-".to_string(),
    }
}

/// First `OVERVIEW_WIDTH` characters of a synopsis; JSON output keeps the full text
fn overview(text: Option<&str>) -> String {
    let text = match text.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return "-".to_string(),
    };
    match text.char_indices().nth(OVERVIEW_WIDTH) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

impl TableRow for TrendingMovie {
    fn header() -> &'static [&'static str] {
        &["ID", "Title", "Rating", "Released", "Poster"]
    }

    fn row(&self, image_base_url: &str) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            format_rating(self.vote_average),
            format_release_date(self.release_date, UNKNOWN_DATE),
            artwork(image_base_url, self.poster_path.as_deref()),
        ]
    }
}

impl TableRow for WatchlistItem {
    fn header() -> &'static [&'static str] {
        &["ID", "Title", "Genres", "Actors", "Released", "Popularity", "Cast tier", "Overview", "Poster"]
    }

    fn row(&self, image_base_url: &str) -> Vec<String> {
        vec![
            self.movie_id.to_string(),
            self.title.clone(),
            self.genres.clone(),
            self.actors.clone(),
            format_release_date(self.release_date, UNKNOWN_DATE),
            self.popularity_score
                .map(|score| format!("{:.1}", score))
                .unwrap_or_else(|| "-".to_string()),
            self.actor_classification.clone().unwrap_or_else(|| "-".to_string()),
            overview(self.overview.as_deref()),
            artwork(image_base_url, self.image_url()),
        ]
    }
}

impl TableRow for SuggestionItem {
    fn header() -> &'static [&'static str] {
        &["ID", "Title", "Rating", "Released", "Overview", "Poster"]
    }

    fn row(&self, image_base_url: &str) -> Vec<String> {
        vec![
            self.movie_id.to_string(),
            self.title.clone(),
            format_rating(self.rating),
            format_release_date(self.release_date, UNKNOWN_DATE),
            overview(self.overview.as_deref()),
            artwork(image_base_url, self.poster_url.as_deref()),
        ]
    }
}

impl TableRow for SearchCandidate {
    fn header() -> &'static [&'static str] {
        &["ID", "Title", "Released", "Poster"]
    }

    fn row(&self, image_base_url: &str) -> Vec<String> {
        vec![
            self.external_id.to_string(),
            self.title.clone(),
            format_release_date(self.release_date, UNKNOWN_DATE),
            artwork(image_base_url, self.poster_path.as_deref()),
        ]
    }
}

/// JSON output carries every record with its `kind` tag
fn entries<T: TableRow>(items: &[T]) -> Vec<CatalogEntry> {
    items.iter().cloned().map(Into::into).collect()
}

pub fn table<T: TableRow>(items: &[T], image_base_url: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        T::header()
            .iter()
            .map(|title| Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)),
    );
    for item in items {
        table.add_row(item.row(image_base_url));
    }
    table
}

/// Navigation links with the active page highlighted
pub fn navigation(output: &Output, current: Route, status: SessionStatus) {
    if output.is_json() || output.is_quiet() {
        return;
    }

    let mut line = format!("{}  ", "CineScope".bright_cyan().bold());
    for route in Route::NAVIGATION {
        if route == current {
            line.push_str(&format!("[{}] ", route.label().bold().underline()));
        } else {
            line.push_str(&format!(" {}  ", route.label().bright_black()));
        }
    }
    if status.is_authenticated() {
        line.push_str(&format!(" {}", "(logout)".bright_black()));
    }
    println!("\n{}", line);
}

/// Render one page's list in whatever state it is in
pub fn list_view<T: TableRow>(output: &Output, route: Route, view: &ListView<T>, image_base_url: &str) {
    if output.is_json() {
        let body = match view {
            ListView::Loading => json!({ "state": "loading" }),
            ListView::Failed(message) => json!({ "state": "failed", "message": message }),
            ListView::Empty(message) => json!({ "state": "empty", "message": message, "items": [] }),
            ListView::Items(items) => json!({ "state": "items", "items": entries(items) }),
        };
        output.json(&json!({ "type": "view", "route": route.name(), "view": body }));
        return;
    }

    if output.is_quiet() {
        return;
    }
    println!("{}", route.label().bold());
    match view {
        ListView::Loading => println!("{}", "Loading...".bright_black()),
        ListView::Failed(message) => println!("{}", message.red()),
        ListView::Empty(message) => println!("{}", message.bright_black()),
        ListView::Items(items) => println!("{}", table(items, image_base_url)),
    }
}

/// Render whatever `route` shows
pub fn page(output: &Output, app: &AppContext, route: Route, image_base_url: &str) {
    match route {
        Route::Trending => list_view(output, route, &app.trending().view(), image_base_url),
        Route::Watchlist => list_view(output, route, &app.watchlist().view(), image_base_url),
        Route::Suggestions => list_view(output, route, &app.suggestions().view(), image_base_url),
        Route::Login => output.info("Sign in with 'login', or create an account with 'register'."),
        Route::Register => output.info("Create an account with 'register', or sign in with 'login'."),
    }
}

pub fn candidates(output: &Output, query: &str, results: &[SearchCandidate], image_base_url: &str) {
    if output.is_json() {
        output.json(&json!({ "type": "search", "query": query, "results": entries(results) }));
        return;
    }
    if output.is_quiet() {
        return;
    }
    if results.is_empty() {
        println!("{}", format!("No results for \"{}\"", query).bright_black());
    } else {
        println!("{}", table(results, image_base_url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinescope_models::MovieId;
    use chrono::NaiveDate;

    #[test]
    fn test_trending_row_formats_fields() {
        let movie = TrendingMovie {
            id: MovieId::new(603),
            title: "The Matrix".to_string(),
            poster_path: Some("/matrix.jpg".to_string()),
            vote_average: Some(8.21),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31),
        };
        let row = movie.row("https://img.example/w500");
        assert_eq!(
            row,
            vec![
                "603",
                "The Matrix",
                "8.2/10",
                "March 31, 1999",
                "https://img.example/w500/matrix.jpg"
            ]
        );
    }

    #[test]
    fn test_missing_artwork_and_date() {
        let candidate = SearchCandidate {
            external_id: MovieId::new(1),
            title: "Heat".to_string(),
            poster_path: None,
            release_date: None,
        };
        let row = candidate.row("https://img.example");
        assert_eq!(row[2], UNKNOWN_DATE);
        assert_eq!(row[3], "-");
    }

    #[test]
    fn test_suggestion_row_shows_shortened_overview() {
        let item = SuggestionItem {
            movie_id: MovieId::new(8392),
            title: "My Neighbor Totoro".to_string(),
            poster_url: None,
            overview: Some(
                "Two sisters move to the country with their father to be closer to their hospitalized mother, and meet forest spirits."
                    .to_string(),
            ),
            release_date: None,
            rating: None,
        };
        let row = item.row("https://img.example");
        assert_eq!(row[4], "Two sisters move to the country with their father to be clos...");
        assert_eq!(row[5], "-");
    }

    #[test]
    fn test_short_or_missing_overview() {
        assert_eq!(overview(Some("  A heist goes wrong.  ")), "A heist goes wrong.");
        assert_eq!(overview(Some("   ")), "-");
        assert_eq!(overview(None), "-");
        // Cuts on character boundaries
        let accented = "é".repeat(OVERVIEW_WIDTH + 5);
        assert_eq!(overview(Some(&accented)), format!("{}...", "é".repeat(OVERVIEW_WIDTH)));
    }

    #[test]
    fn test_table_has_one_row_per_item() {
        let items = vec![
            SuggestionItem {
                movie_id: MovieId::new(1),
                title: "Ran".to_string(),
                poster_url: None,
                overview: None,
                release_date: None,
                rating: Some(8.0),
            },
            SuggestionItem {
                movie_id: MovieId::new(2),
                title: "Akira".to_string(),
                poster_url: None,
                overview: None,
                release_date: None,
                rating: None,
            },
        ];
        let rendered = table(&items, "https://img.example").to_string();
        assert!(rendered.contains("Ran"));
        assert!(rendered.contains("Akira"));
        assert!(rendered.contains("N/A/10"));
    }
}
