use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Tags a conversation fetch so late answers can be told apart from the latest one.
pub type RequestId = u64;

const MAX_NOTIFICATIONS: usize = 20;

/// Non-blocking error toast shown to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: VecDeque<Notification>,
}

impl Notifications {
    pub fn error(&mut self, text: impl Into<String>) {
        self.items.push_back(Notification {
            text: text.into(),
            created_at: Utc::now(),
        });

        // Giữ tối đa MAX_NOTIFICATIONS để không chiếm quá nhiều bộ nhớ
        while self.items.len() > MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
    }

    /// Drop notifications older than `max_age_secs`.
    pub fn expire(&mut self, now: DateTime<Utc>, max_age_secs: i64) {
        self.items
            .retain(|item| now.signed_duration_since(item.created_at).num_seconds() < max_age_secs);
    }

    pub fn dismiss(&mut self, index: usize) {
        self.items.remove(index);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }
}
