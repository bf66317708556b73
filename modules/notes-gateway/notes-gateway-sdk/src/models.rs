//! Request bodies exchanged with the resource services.
//!
//! Each type's serde derive is its serialization schema; there is no shared
//! field-mapping switch. Create and delete bodies always carry every field,
//! empty values included. Update bodies are partial: a `None` field is left
//! out of the PATCH body so the resource service keeps its current value,
//! while `Some("")` explicitly clears it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub user_uuid: String,
    /// Root categories have no parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,
}

/// Sent as the JSON body of `DELETE /categories/{uuid}`; the category service
/// checks ownership against `user_uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCategoryRequest {
    pub uuid: String,
    pub user_uuid: String,
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTagRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub header: String,
    pub body: String,
    pub category_uuid: String,
    #[serde(default)]
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i64>>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub repeat_password: String,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("repeat_password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |p: &Option<String>| p.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("UpdateUserRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("old_password", &redact(&self.old_password))
            .field("new_password", &redact(&self.new_password))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_keeps_empty_fields() {
        let dto = CreateTagRequest {
            name: String::new(),
            color: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"name": "", "color": ""})
        );
    }

    #[test]
    fn create_note_sends_empty_tag_list() {
        let dto = CreateNoteRequest {
            header: "h".into(),
            body: String::new(),
            category_uuid: "c-1".into(),
            tags: vec![],
        };
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["tags"], json!([]));
        assert_eq!(v["body"], "");
    }

    #[test]
    fn update_body_omits_absent_fields_but_keeps_cleared_ones() {
        let dto = UpdateNoteRequest {
            header: None,
            body: Some(String::new()),
            category_uuid: None,
            tags: Some(vec![]),
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"body": "", "tags": []})
        );
    }

    #[test]
    fn root_category_has_no_parent_field() {
        let dto = CreateCategoryRequest {
            name: "work".into(),
            user_uuid: "u-1".into(),
            parent_uuid: None,
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"name": "work", "user_uuid": "u-1"})
        );
    }

    #[test]
    fn delete_category_body_carries_owner() {
        let dto = DeleteCategoryRequest {
            uuid: "c-9".into(),
            user_uuid: "u-1".into(),
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"uuid": "c-9", "user_uuid": "u-1"})
        );
    }

    #[test]
    fn debug_redacts_passwords() {
        let dto = CreateUserRequest {
            email: "a@b.c".into(),
            username: "ann".into(),
            password: "hunter2".into(),
            repeat_password: "hunter2".into(),
        };
        let out = format!("{dto:?}");
        assert!(!out.contains("hunter2"));
        assert!(out.contains("[REDACTED]"));

        let upd = UpdateUserRequest {
            new_password: Some("s3cret".into()),
            ..Default::default()
        };
        assert!(!format!("{upd:?}").contains("s3cret"));
    }
}
