//! Users, creators, and profile edits.
//!
//! A user with role [`Role::Creator`] owns exactly one [`Creator`] record,
//! linked through `User::creator_id` and `Creator::user_id`. The follow graph
//! lives on both sides (`User::following`, `Creator::followers`) and the
//! store keeps the two in sync.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Account role requested at signup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    General,
    Creator,
    Explorer,
}

/// A RUSH account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Login key; unique across users.
    pub email: String,
    /// Opaque comparison string. Never hashed here; there is no real auth.
    pub password: String,
    pub role: Role,
    /// `None` until the user picks a campus.
    #[serde(default)]
    pub campus_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub quiz_answers: BTreeMap<String, String>,
    /// Followed creator ids, in follow order.
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
}

/// Public-facing profile of a food creator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Follower user ids, in follow order.
    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
}

/// Partial profile update.
///
/// An absent field leaves the stored value alone. For the clearable fields
/// (`bio`, `photo`, `instagram`) an explicit `null` is distinct from absence:
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub bio: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub instagram: Option<Option<String>>,
    /// Creator contact email. The login email is never changed by a patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_answers: Option<BTreeMap<String, String>>,
}

/// Maps a present JSON value (including `null`) to `Some(..)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProfilePatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the patch into a user record.
    pub(crate) fn merge_into_user(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        if let Some(photo) = &self.photo {
            user.photo = photo.clone();
        }
        if let Some(instagram) = &self.instagram {
            user.instagram = instagram.clone();
        }
        if let Some(interests) = &self.interests {
            user.interests = interests.clone();
        }
        if let Some(answers) = &self.quiz_answers {
            user.quiz_answers = answers.clone();
        }
    }

    /// Merge the creator-facing subset (name, bio, email, instagram).
    pub(crate) fn merge_into_creator(&self, creator: &mut Creator) {
        if let Some(name) = &self.name {
            creator.name = name.clone();
        }
        if let Some(bio) = &self.bio {
            creator.bio = bio.clone();
        }
        if let Some(email) = &self.email {
            creator.email = Some(email.clone());
        }
        if let Some(instagram) = &self.instagram {
            creator.instagram = instagram.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_distinct_from_absent() {
        let patch: ProfilePatch = serde_json::from_str(r#"{"bio": null}"#).unwrap();
        assert_eq!(patch.bio, Some(None));
        assert_eq!(patch.photo, None);

        let patch: ProfilePatch = serde_json::from_str(r#"{"photo": "me.jpg"}"#).unwrap();
        assert_eq!(patch.photo, Some(Some("me.jpg".into())));
        assert_eq!(patch.bio, None);
    }

    #[test]
    fn cleared_field_survives_serialization() {
        let patch = ProfilePatch {
            bio: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"bio":null}"#);
        let back: ProfilePatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patch);
    }

    #[test]
    fn merge_leaves_absent_fields() {
        let mut user = User {
            name: "Sam".into(),
            bio: Some("hungry".into()),
            photo: Some("old.jpg".into()),
            ..Default::default()
        };
        ProfilePatch {
            photo: Some(None),
            ..Default::default()
        }
        .merge_into_user(&mut user);
        assert_eq!(user.name, "Sam");
        assert_eq!(user.bio.as_deref(), Some("hungry"));
        assert_eq!(user.photo, None);
    }

    #[test]
    fn creator_merge_ignores_user_only_fields() {
        let mut creator = Creator::default();
        ProfilePatch {
            name: Some("Taco Lab".into()),
            email: Some("tacos@uni.edu".into()),
            interests: Some(vec!["vegan".into()]),
            ..Default::default()
        }
        .merge_into_creator(&mut creator);
        assert_eq!(creator.name, "Taco Lab");
        assert_eq!(creator.email.as_deref(), Some("tacos@uni.edu"));
    }

    #[test]
    fn empty_patch_detected() {
        assert!(ProfilePatch::default().is_empty());
        assert!(
            !ProfilePatch {
                bio: Some(None),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Creator).unwrap(), r#""creator""#);
    }
}
