//! Filter builders for free-text search.

use core_accounts::SearchText;
use mongodb::bson::{Document, doc};

/// Case-insensitive OR filter over `fields`, plus an exact `_id` match when
/// the term is a valid ObjectId.
///
/// ```
/// use core_accounts::SearchText;
/// use database::mongodb::text_search_filter;
///
/// let filter = text_search_filter(&SearchText::new("ali"), &["firstName", "email"]);
/// assert_eq!(filter.get_array("$or").unwrap().len(), 2);
/// ```
pub fn text_search_filter(term: &SearchText, fields: &[&str]) -> Document {
    let pattern = term.pattern();
    let mut clauses: Vec<Document> = fields
        .iter()
        .map(|field| doc! { *field: { "$regex": &pattern, "$options": "i" } })
        .collect();

    if let Some(id) = term.as_object_id() {
        clauses.push(doc! { "_id": id });
    }

    doc! { "$or": clauses }
}

/// Merge an optional search term into an existing filter.
pub fn with_search(mut filter: Document, term: Option<&SearchText>, fields: &[&str]) -> Document {
    if let Some(term) = term {
        filter.extend(text_search_filter(term, fields));
    }
    filter
}

/// Matches documents where any of `fields` holds a path or URL ending in
/// `file_name`. Array fields match when one element does.
pub fn file_reference_filter(fields: &[&str], file_name: &str) -> Document {
    let pattern = format!("(^|/){}$", SearchText::new(file_name).pattern());
    let clauses: Vec<Document> = fields
        .iter()
        .map(|field| doc! { *field: { "$regex": &pattern } })
        .collect();
    doc! { "$or": clauses }
}
