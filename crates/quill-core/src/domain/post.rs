use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a single authored text entry, optionally tagged with a
/// group and an image.
///
/// The author is immutable after creation; edits may change the text, the
/// group tag and the image, never the author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(
        author_id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            group_id,
            text,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit, refreshing `updated_at`. The author never changes.
    pub fn edit(&mut self, text: String, group_id: Option<Uuid>, image_url: Option<String>) {
        self.text = text;
        self.group_id = group_id;
        self.image_url = image_url;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_keeps_author_and_created_at() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, "first".into(), None, None);
        let created = post.created_at;

        post.edit("second".into(), Some(Uuid::new_v4()), None);

        assert_eq!(post.author_id, author);
        assert_eq!(post.created_at, created);
        assert_eq!(post.text, "second");
        assert!(post.updated_at >= created);
    }
}
