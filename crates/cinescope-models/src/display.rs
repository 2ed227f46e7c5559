use chrono::NaiveDate;

/// Long-form US date ("October 16, 2026"), or `fallback` when unknown.
pub fn format_release_date(date: Option<NaiveDate>, fallback: &str) -> String {
    match date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => fallback.to_string(),
    }
}

/// Rating on the 10-point scale with one decimal ("7.3/10"); "N/A/10" when absent.
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(rating) => format!("{:.1}/10", rating),
        None => "N/A/10".to_string(),
    }
}

/// Resolve a catalog artwork reference against the image CDN.
///
/// Absolute URLs pass through untouched; relative catalog paths are joined to
/// `image_base_url`.
pub fn poster_url(image_base_url: &str, artwork: &str) -> String {
    if artwork.starts_with("http://") || artwork.starts_with("https://") {
        return artwork.to_string();
    }
    let base = image_base_url.trim_end_matches('/');
    if artwork.starts_with('/') {
        format!("{}{}", base, artwork)
    } else {
        format!("{}/{}", base, artwork)
    }
}
