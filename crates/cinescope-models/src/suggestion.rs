use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::movie::MovieId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionItem {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<f64>,
}
