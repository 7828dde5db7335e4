use common::consts::MIN_ARTICLE_CHARS;
use common::errors::ReviewError;
use serde::Deserialize;
use serde_json::Value;

/// Inbound body of `POST /api/analyze`. A missing or `null` article is
/// treated the same as an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub article: Option<String>,
}

/// Decodes the request body and returns the trimmed article.
pub fn validate_article(body: &[u8]) -> Result<String, ReviewError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ReviewError::MalformedRequest(err.to_string()))?;

    // derived Deserialize would also take a sequence for the struct
    if !value.is_object() {
        return Err(ReviewError::MalformedRequest(
            "request body is not a JSON object".to_string(),
        ));
    }

    let request: ReviewRequest = serde_json::from_value(value)
        .map_err(|err| ReviewError::MalformedRequest(err.to_string()))?;

    let article = request.article.unwrap_or_default();
    let article = article.trim();

    if article.is_empty() {
        return Err(ReviewError::EmptyArticle);
    }

    // length in characters; CJK text is three bytes per char in UTF-8
    if article.chars().count() < MIN_ARTICLE_CHARS {
        return Err(ReviewError::ArticleTooShort);
    }

    Ok(article.to_string())
}
