use core_accounts::{Page, PageQuery};
use futures_util::TryStreamExt;
use mongodb::{
    Collection,
    bson::{Document, doc},
    options::FindOptions,
};
use serde::de::DeserializeOwned;

/// Count and fetch one page of `filter`, newest first.
pub async fn find_page<T>(
    collection: &Collection<T>,
    filter: Document,
    query: &PageQuery,
) -> mongodb::error::Result<Page<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let total = collection.count_documents(filter.clone()).await?;

    let options = FindOptions::builder()
        .sort(doc! { "createdAt": -1, "_id": -1 })
        .skip(query.skip())
        .limit(query.limit() as i64)
        .build();

    let items: Vec<T> = collection
        .find(filter)
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    Ok(Page::new(items, total, query))
}
