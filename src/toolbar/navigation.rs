use crate::error::InvariantViolation;
use crate::model::{ListContext, RouteState, ARTICLE_SEGMENT, SEARCH_SEGMENT};

/// Path showing the results of `query` from the list in `route`.
///
/// Inside a search list the existing query is replaced; from any other list
/// a search segment is appended.
pub fn search_path(route: &RouteState, query: &str) -> Result<String, InvariantViolation> {
    let RouteState::List { path, context } = route else {
        return Err(InvariantViolation::NotInList);
    };
    let encoded = urlencoding::encode(query);

    if *context == ListContext::Search {
        if let Some(idx) = path.find(SEARCH_SEGMENT) {
            let base = &path[..idx + SEARCH_SEGMENT.len()];
            return Ok(format!("{}{}", base, encoded));
        }
    }
    Ok(format!(
        "{}{}{}",
        path.trim_end_matches('/'),
        SEARCH_SEGMENT,
        encoded
    ))
}

/// Where the "up" button leads, or `None` when there is nowhere to go.
///
/// An article goes back to its list and a search list goes back to the list
/// it searched.
pub fn up_path(route: &RouteState) -> Option<String> {
    match route {
        RouteState::Article { path, .. } => path
            .find(ARTICLE_SEGMENT)
            .map(|idx| path[..idx].to_string()),
        RouteState::List {
            path,
            context: ListContext::Search,
        } => path.find(SEARCH_SEGMENT).map(|idx| path[..idx].to_string()),
        _ => None,
    }
}
