/// Raw `title`/`publisher` query parameters of a book listing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookQueryParams {
    pub title: Option<String>,
    pub publisher: Option<String>,
}

impl BookQueryParams {
    /// Picks `title` and `publisher` out of decoded query pairs; other keys are ignored.
    /// A repeated key keeps every value, joined with commas in request order.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let collect = |name: &str| {
            let values: Vec<&str> = pairs.iter()
                .filter(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(values.join(","))
            }
        };
        BookQueryParams {
            title: collect("title"),
            publisher: collect("publisher"),
        }
    }
}

/// The lookup a listing request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum BookQuery {
    All,
    ByTitle(String),
    ByPublisher(String),
    ByTitleAndPublisher(String, String),
}

impl BookQuery {
    /// Selects exactly one lookup. Missing and whitespace-only values count as absent;
    /// present values are passed on untouched for exact matching.
    pub fn from_params(title: Option<&str>, publisher: Option<&str>) -> Self {
        let title = title.filter(|s| !s.trim().is_empty());
        let publisher = publisher.filter(|s| !s.trim().is_empty());
        match (title, publisher) {
            (None, None) => BookQuery::All,
            (Some(title), None) => BookQuery::ByTitle(title.to_string()),
            (Some(title), Some(publisher)) => BookQuery::ByTitleAndPublisher(title.to_string(), publisher.to_string()),
            (None, Some(publisher)) => BookQuery::ByPublisher(publisher.to_string()),
        }
    }
}

impl From<&BookQueryParams> for BookQuery {
    fn from(params: &BookQueryParams) -> Self {
        BookQuery::from_params(params.title.as_deref(), params.publisher.as_deref())
    }
}
