use mongodb::{Database, bson::doc};

use crate::error::{DatabaseError, DatabaseResult};

/// Round-trip a `ping` command.
pub async fn ping(db: &Database) -> DatabaseResult<()> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::Ping(e.to_string()))?;
    Ok(())
}
