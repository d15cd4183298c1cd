//! Favorite edges: a user's bookmarked accommodations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership of one accommodation in one user's favorites. Unique per
/// `(user_id, accommodation_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEdge {
  pub user_id:          String,
  pub accommodation_id: String,
  pub added_at:         DateTime<Utc>,
}
