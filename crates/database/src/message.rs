//! Chat message history.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Message;
use crate::user;

/// Store a chat message from a known user.
pub async fn save_message(pool: &SqlitePool, room: &str, sender_id: i64, text: &str) -> Result<Message> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO messages (room, sender_id, text)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(room)
    .bind(sender_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    get_message(pool, id).await
}

/// Store a message attributed by username.
///
/// Returns `None` without storing anything when no account has that
/// username; chat from anonymous senders is relayed but not kept.
pub async fn save_for_username(
    pool: &SqlitePool,
    room: &str,
    username: &str,
    text: &str,
) -> Result<Option<Message>> {
    match user::get_user_by_username(pool, username).await {
        Ok(sender) => save_message(pool, room, sender.id, text).await.map(Some),
        Err(DatabaseError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

async fn get_message(pool: &SqlitePool, id: i64) -> Result<Message> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT m.id, m.room, m.sender_id, u.username AS sender_username, m.text, m.timestamp
        FROM messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Message", id))
}

/// A room's history, oldest first.
pub async fn list_messages(pool: &SqlitePool, room: &str) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT m.id, m.room, m.sender_id, u.username AS sender_username, m.text, m.timestamp
        FROM messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.room = ?
        ORDER BY m.timestamp, m.id
        "#,
    )
    .bind(room)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, test_db};

    #[tokio::test]
    async fn test_history_per_room_in_order() {
        let db = test_db().await;
        let (lawyer, _) = testing::lawyer(&db, "counsel").await;
        let (client, _) = testing::client(&db, "client").await;

        save_message(db.pool(), "7", client.id, "Hello").await.unwrap();
        save_message(db.pool(), "7", lawyer.id, "Good morning").await.unwrap();
        save_message(db.pool(), "8", client.id, "Elsewhere").await.unwrap();

        let history = list_messages(db.pool(), "7").await.unwrap();
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "Good morning"]);
        assert_eq!(history[1].sender_username, "counsel");
    }

    #[tokio::test]
    async fn test_unknown_sender_not_stored() {
        let db = test_db().await;
        testing::client(&db, "client").await;

        let stored = save_for_username(db.pool(), "room", "CLIENT", "hi").await.unwrap();
        assert_eq!(stored.map(|m| m.sender_username), Some("client".to_string()));

        let stored = save_for_username(db.pool(), "room", "ghost", "boo").await.unwrap();
        assert!(stored.is_none());
        assert_eq!(list_messages(db.pool(), "room").await.unwrap().len(), 1);
    }
}
