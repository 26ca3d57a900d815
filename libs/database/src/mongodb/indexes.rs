use mongodb::{
    Collection, IndexModel,
    bson::doc,
    error::{Error, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tracing::info;

const DUPLICATE_KEY: i32 = 11000;

/// Create one unique ascending index per field. Existing identical indexes are a no-op.
pub async fn ensure_unique_indexes<T>(
    collection: &Collection<T>,
    fields: &[&str],
) -> mongodb::error::Result<()>
where
    T: Send + Sync,
{
    let models: Vec<IndexModel> = fields
        .iter()
        .map(|field| {
            IndexModel::builder()
                .keys(doc! { *field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{field}_unique"))
                        .build(),
                )
                .build()
        })
        .collect();

    collection.create_indexes(models).await?;
    info!(collection = collection.name(), ?fields, "Unique indexes ensured");
    Ok(())
}

/// True when a write was rejected by a unique index.
pub fn is_duplicate_key(error: &Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// The field named in a duplicate-key message such as
/// `... index: email_unique dup key: { email: "a@x.com" }`.
pub fn duplicate_key_field(error: &Error) -> Option<String> {
    if !is_duplicate_key(error) {
        return None;
    }
    let message = error.to_string();
    let after = message.split("dup key: {").nth(1)?;
    let field = after.trim_start().split(':').next()?.trim();
    (!field.is_empty()).then(|| field.to_string())
}
