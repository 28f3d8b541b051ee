//! Shared fixtures for domain unit tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use super::{Article, ArticleId, Role, User, UserId};

/// Clock frozen at a fixed instant.
pub(crate) struct FixtureClock {
    pub(crate) now: DateTime<Utc>,
}

impl FixtureClock {
    pub(crate) fn at(seconds: i64) -> Self {
        Self {
            now: DateTime::from_timestamp(seconds, 0).expect("valid fixture timestamp"),
        }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

pub(crate) fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid fixture user id")
}

pub(crate) fn user(raw: &str) -> User {
    User::new(user_id(raw), Some(format!("{raw} name")), None, Role::User)
}

pub(crate) fn article(id: &str, author: &str) -> Article {
    let now = DateTime::from_timestamp(1_700_000_000, 0).expect("valid fixture timestamp");
    Article {
        id: ArticleId::new(id).expect("valid fixture article id"),
        title: "Stored title".to_owned(),
        content: "c".repeat(200),
        slug: format!("stored-title_{id}"),
        author_id: user_id(author),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn long_content() -> String {
    "Lorem ipsum dolor sit amet. ".repeat(8)
}
