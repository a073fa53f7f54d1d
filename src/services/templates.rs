//! Email template management with ownership rules: anyone sees their own
//! plus public templates, the owner or an admin may edit, only admins may
//! delete.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{DbEmailTemplate, LeadDb};
use crate::error::LeadError;
use crate::types::{User, UserRole};

/// Fields supplied when creating or editing a template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub is_public: bool,
}

/// Create a template owned by `owner`.
pub fn create_template(
    db: &LeadDb,
    input: TemplateInput,
    owner: &User,
) -> Result<DbEmailTemplate, LeadError> {
    let now = Utc::now().to_rfc3339();
    let template = DbEmailTemplate {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        subject: input.subject,
        body: input.body,
        user_id: owner.id.clone(),
        is_public: input.is_public,
        created_at: now.clone(),
        updated_at: now,
    };
    db.insert_template(&template)?;
    Ok(template)
}

/// Templates visible to `user`: their own plus public ones.
pub fn list_templates(db: &LeadDb, user: &User) -> Result<Vec<DbEmailTemplate>, LeadError> {
    Ok(db.list_templates_visible_to(&user.id)?)
}

/// Edit a template. Allowed for the owner or an admin.
pub fn update_template(
    db: &LeadDb,
    id: &str,
    input: TemplateInput,
    actor: &User,
) -> Result<DbEmailTemplate, LeadError> {
    let existing = db
        .get_template(id)?
        .ok_or_else(|| LeadError::NotFound(format!("template {id}")))?;

    if existing.user_id != actor.id && actor.role != UserRole::Admin {
        return Err(LeadError::Forbidden(
            "Not authorized to update this template".to_string(),
        ));
    }

    db.update_template(id, &input.name, &input.subject, &input.body, input.is_public)?;
    db.get_template(id)?
        .ok_or_else(|| LeadError::NotFound(format!("template {id}")))
}

/// Delete a template. Admin only.
pub fn delete_template(db: &LeadDb, id: &str, actor: &User) -> Result<(), LeadError> {
    if actor.role != UserRole::Admin {
        return Err(LeadError::Forbidden(
            "Only admins can delete templates".to_string(),
        ));
    }
    let n = db.delete_template(id)?;
    if n == 0 {
        return Err(LeadError::NotFound(format!("template {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn user(id: &str, role: UserRole) -> User {
        User {
            id: id.to_string(),
            name: "Someone".to_string(),
            email: format!("{id}@leadflow.example"),
            role,
        }
    }

    fn input(name: &str, is_public: bool) -> TemplateInput {
        TemplateInput {
            name: name.to_string(),
            subject: "Quick question".to_string(),
            body: "Hi there,".to_string(),
            is_public,
        }
    }

    #[test]
    fn test_visibility_rules() {
        let db = test_db();
        let owner = user("u1", UserRole::Intern);
        let other = user("u2", UserRole::Intern);

        create_template(&db, input("private", false), &owner).unwrap();
        create_template(&db, input("shared", true), &owner).unwrap();

        let theirs = list_templates(&db, &other).unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].name, "shared");

        let mine = list_templates(&db, &owner).unwrap();
        assert_eq!(mine.len(), 2);
    }

    #[test]
    fn test_update_is_owner_or_admin() {
        let db = test_db();
        let owner = user("u1", UserRole::Intern);
        let stranger = user("u2", UserRole::Manager);
        let admin = user("u3", UserRole::Admin);
        let t = create_template(&db, input("draft", false), &owner).unwrap();

        let err = update_template(&db, &t.id, input("hijacked", false), &stranger).unwrap_err();
        assert!(matches!(err, LeadError::Forbidden(_)));

        let by_owner = update_template(&db, &t.id, input("renamed", false), &owner).unwrap();
        assert_eq!(by_owner.name, "renamed");

        let by_admin = update_template(&db, &t.id, input("final", true), &admin).unwrap();
        assert_eq!(by_admin.name, "final");
        assert!(by_admin.is_public);
    }

    #[test]
    fn test_delete_is_admin_only() {
        let db = test_db();
        let owner = user("u1", UserRole::Intern);
        let admin = user("u2", UserRole::Admin);
        let t = create_template(&db, input("draft", false), &owner).unwrap();

        let err = delete_template(&db, &t.id, &owner).unwrap_err();
        assert!(matches!(err, LeadError::Forbidden(_)));

        delete_template(&db, &t.id, &admin).unwrap();
        let err = delete_template(&db, &t.id, &admin).unwrap_err();
        assert!(matches!(err, LeadError::NotFound(_)));
    }
}
