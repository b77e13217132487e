//! Pending-submission state: who is allowed to send content right now, and
//! which admin-facing review messages still await a decision.

use std::collections::{HashMap, HashSet};

use crate::core::{Result, ReviewItem, SuggestError};

/// Owned by the moderation worker; single writer, so plain collections.
#[derive(Debug, Default)]
pub struct PendingRegistry {
    waiting: HashSet<i64>,
    reviews: HashMap<i32, ReviewItem>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the user as expected to send one piece of content. Idempotent.
    pub fn mark_waiting(&mut self, user_id: i64) {
        self.waiting.insert(user_id);
    }

    pub fn is_waiting(&self, user_id: i64) -> bool {
        self.waiting.contains(&user_id)
    }

    /// No-op if the user is not waiting.
    pub fn clear_waiting(&mut self, user_id: i64) {
        self.waiting.remove(&user_id);
    }

    /// Stores a review item under the admin-facing message id. A duplicate key
    /// means the sequencing contract was broken; it is an error, never a
    /// silent overwrite.
    pub fn register_review(&mut self, review_message_id: i32, item: ReviewItem) -> Result<()> {
        if self.reviews.contains_key(&review_message_id) {
            return Err(SuggestError::DuplicateReview(review_message_id));
        }
        self.reviews.insert(review_message_id, item);
        Ok(())
    }

    pub fn get_review(&self, review_message_id: i32) -> Option<&ReviewItem> {
        self.reviews.get(&review_message_id)
    }

    /// Deletes and returns the review item; `None` if absent.
    pub fn remove_review(&mut self, review_message_id: i32) -> Option<ReviewItem> {
        self.reviews.remove(&review_message_id)
    }

    /// Number of reviews still awaiting a decision.
    pub fn open_reviews(&self) -> usize {
        self.reviews.len()
    }

    /// Ids of reviews still awaiting a decision, in no particular order.
    pub fn review_ids(&self) -> Vec<i32> {
        self.reviews.keys().copied().collect()
    }
}
