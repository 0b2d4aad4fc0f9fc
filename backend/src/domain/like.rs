//! Photo likes and the tallies derived from them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::{PhotoId, TagList};

/// Longest accepted voter display name, in characters.
pub const MAX_VOTER_CHARS: usize = 100;

/// One like cast by a named guest. Repeats accumulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub photo_id: PhotoId,
    pub voter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LikeValidationError {
    #[error("voter name must not be empty")]
    EmptyVoter,
    #[error("voter name must be at most {max} characters")]
    VoterTooLong { max: usize },
}

impl LikeRecord {
    /// Validate and normalise a like before it is stored.
    pub fn new(photo_id: PhotoId, voter: &str) -> Result<Self, LikeValidationError> {
        let voter = voter.trim();
        if voter.is_empty() {
            return Err(LikeValidationError::EmptyVoter);
        }
        if voter.chars().count() > MAX_VOTER_CHARS {
            return Err(LikeValidationError::VoterTooLong {
                max: MAX_VOTER_CHARS,
            });
        }
        Ok(Self {
            photo_id,
            voter: voter.to_owned(),
        })
    }
}

/// Number of likes per photo.
pub fn count_by_photo(likes: &[LikeRecord]) -> BTreeMap<PhotoId, u64> {
    likes.iter().fold(BTreeMap::new(), |mut counts, like| {
        *counts.entry(like.photo_id).or_default() += 1;
        counts
    })
}

/// Number of likes per main category.
///
/// Each like counts once for every main category of the liked photo; a photo
/// tagged `ceremony/vows` and `ceremony/rings` contributes two to `ceremony`.
/// Likes on photos without tags (or with unreadable tags) count nowhere.
pub fn count_by_category(
    likes: &[LikeRecord],
    tags_by_photo: &HashMap<PhotoId, TagList>,
) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for like in likes {
        let Some(tags) = tags_by_photo.get(&like.photo_id) else {
            continue;
        };
        for category in tags.main_categories() {
            *counts.entry(category.to_owned()).or_default() += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Ana ", Ok("Ana"))]
    #[case("", Err(LikeValidationError::EmptyVoter))]
    #[case("   ", Err(LikeValidationError::EmptyVoter))]
    fn normalises_voter(#[case] voter: &str, #[case] expected: Result<&str, LikeValidationError>) {
        let photo_id = PhotoId::random();
        let result = LikeRecord::new(photo_id, voter).map(|like| like.voter);
        assert_eq!(result, expected.map(str::to_owned));
    }

    #[rstest]
    fn repeated_likes_accumulate() {
        let photo = PhotoId::random();
        let other = PhotoId::random();
        let likes = vec![
            LikeRecord::new(photo, "Ana").expect("valid like"),
            LikeRecord::new(photo, "Ana").expect("valid like"),
            LikeRecord::new(other, "Luis").expect("valid like"),
        ];
        let counts = count_by_photo(&likes);
        assert_eq!(counts.get(&photo), Some(&2));
        assert_eq!(counts.get(&other), Some(&1));
    }

    #[rstest]
    fn category_counts_attribute_each_main_category() {
        let photo = PhotoId::random();
        let untagged = PhotoId::random();
        let tags = HashMap::from([
            (photo, TagList::parse_csv("ceremony/vows,party")),
            (untagged, TagList::default()),
        ]);
        let likes = vec![
            LikeRecord::new(photo, "Ana").expect("valid like"),
            LikeRecord::new(photo, "Luis").expect("valid like"),
            LikeRecord::new(untagged, "Eva").expect("valid like"),
            LikeRecord::new(PhotoId::random(), "Eva").expect("valid like"),
        ];
        let counts = count_by_category(&likes, &tags);
        assert_eq!(
            counts,
            BTreeMap::from([("ceremony".to_owned(), 2), ("party".to_owned(), 2)])
        );
    }
}
