use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::movie::MovieId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingMovie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
}
