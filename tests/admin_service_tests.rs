//! Integration tests for admin account management
//!
//! Runs the admin service against an in-memory SQLite database with
//! recording fakes for lifecycle events and image storage.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use common::Harness;
use storefront_admin::error::AppError;
use storefront_admin::services::{AdminEvent, AdminInput};

fn input(email: &str, role_id: i64) -> AdminInput {
    AdminInput {
        name: Some("Jane Admin".to_string()),
        email: Some(email.to_string()),
        role_id: Some(role_id),
        ..Default::default()
    }
}

// ============================================================================
// Create
// ============================================================================

mod create {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_input_is_invalid_parameter() {
        let h = Harness::new().await;

        let err = h.admins.create(None).await.unwrap_err();
        assert_matches!(&err, AppError::Validation(_));
        assert_eq!(err.to_string(), "Invalid parameters provided.");

        let err = h.admins.create(Some(AdminInput::default())).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameters provided.");
        assert!(h.notifier.names().is_empty());
    }

    #[tokio::test]
    async fn test_required_fields_are_reported() {
        let h = Harness::new().await;

        let err = h
            .admins
            .create(Some(AdminInput {
                status: Some(true),
                ..Default::default()
            }))
            .await
            .unwrap_err();

        assert_matches!(&err, AppError::Validation(e) if e.has("name") && e.has("email") && e.has("role_id"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let h = Harness::new().await;
        h.insert_admin("taken@example.com", "secret1", true).await;

        let err = h
            .admins
            .create(Some(input("Taken@Example.com", h.role.id)))
            .await
            .unwrap_err();

        assert_matches!(&err, AppError::Validation(e) if e.field("email") == ["The email has already been taken."]);
        assert_eq!(h.admin_count().await, 1);
        assert!(h.notifier.names().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let h = Harness::new().await;

        let err = h
            .admins
            .create(Some(input("not-an-email", h.role.id)))
            .await
            .unwrap_err();
        assert_matches!(&err, AppError::Validation(e) if e.has("email"));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let h = Harness::new().await;

        let err = h
            .admins
            .create(Some(AdminInput {
                password: Some("12345".to_string()),
                password_confirmation: Some("12345".to_string()),
                ..input("jane@example.com", h.role.id)
            }))
            .await
            .unwrap_err();
        assert_matches!(&err, AppError::Validation(e) if e.has("password"));
    }

    #[tokio::test]
    async fn test_password_confirmation_must_match() {
        let h = Harness::new().await;

        let err = h
            .admins
            .create(Some(AdminInput {
                password: Some("secret12".to_string()),
                password_confirmation: Some("secret13".to_string()),
                ..input("jane@example.com", h.role.id)
            }))
            .await
            .unwrap_err();
        assert_matches!(&err, AppError::Validation(e) if e.has("password_confirmation"));
        assert_eq!(h.admin_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_found() {
        let h = Harness::new().await;

        let err = h
            .admins
            .create(Some(input("jane@example.com", 999)))
            .await
            .unwrap_err();

        assert_matches!(&err, AppError::NotFound(msg) if msg == "Role not found.");
        assert_eq!(h.admin_count().await, 0);
        assert!(h.notifier.names().is_empty());
    }

    #[tokio::test]
    async fn test_password_is_hashed_with_api_token() {
        let h = Harness::new().await;

        let result = h
            .admins
            .create(Some(AdminInput {
                password: Some("secret12".to_string()),
                password_confirmation: Some("secret12".to_string()),
                ..input("jane@example.com", h.role.id)
            }))
            .await
            .unwrap();

        assert_eq!(result.message, "User created successfully.");
        let stored = h.db.admins().get_by_id(result.admin.id).await.unwrap().unwrap();
        let hash = stored.password.unwrap();
        assert_ne!(hash, "secret12");
        assert!(bcrypt::verify("secret12", &hash).unwrap());

        let token = stored.api_token.unwrap();
        assert_eq!(token.len(), 80);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_without_password_has_no_credentials() {
        let h = Harness::new().await;

        let result = h
            .admins
            .create(Some(input("jane@example.com", h.role.id)))
            .await
            .unwrap();

        assert_eq!(result.admin.password, None);
        assert_eq!(result.admin.api_token, None);
    }

    #[tokio::test]
    async fn test_status_defaults_to_inactive() {
        let h = Harness::new().await;

        let result = h
            .admins
            .create(Some(input("jane@example.com", h.role.id)))
            .await
            .unwrap();
        assert!(!result.admin.status);
    }

    #[tokio::test]
    async fn test_events_wrap_the_insert() {
        let h = Harness::new().await;

        let result = h
            .admins
            .create(Some(input("jane@example.com", h.role.id)))
            .await
            .unwrap();

        assert_eq!(
            h.notifier.events(),
            vec![
                AdminEvent::CreateBefore,
                AdminEvent::CreateAfter(result.admin.clone()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_image_skips_image_store() {
        let h = Harness::new().await;

        let result = h
            .admins
            .create(Some(AdminInput {
                image: Some(String::new()),
                ..input("jane@example.com", h.role.id)
            }))
            .await
            .unwrap();

        assert!(h.images.calls().is_empty());
        assert_eq!(result.admin.image, None);
    }

    #[tokio::test]
    async fn test_image_is_attached_once_to_new_admin() {
        let h = Harness::new().await;

        let result = h
            .admins
            .create(Some(AdminInput {
                image: Some("https://cdn.example.com/jane.png".to_string()),
                ..input("jane@example.com", h.role.id)
            }))
            .await
            .unwrap();

        let calls = h.images.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].owner_id, result.admin.id);
        assert_eq!(calls[0].source, "https://cdn.example.com/jane.png");
        assert_eq!(calls[0].prefix, "admins/");
        assert_eq!(calls[0].field, "image");

        let expected = format!("admins/{}/avatar.png", result.admin.id);
        assert_eq!(result.admin.image.as_deref(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_rejected_image_leaves_no_admin_behind() {
        let h = Harness::new().await;
        let bad = AdminInput {
            image: Some("data:text/plain;base64,aGVsbG8=".to_string()),
            ..input("jane@example.com", h.role.id)
        };

        let err = h.admins.create(Some(bad)).await.unwrap_err();

        assert_matches!(&err, AppError::Validation(_));
        assert_eq!(err.to_string(), "The image must be an image.");
        assert_eq!(h.admin_count().await, 0);
        assert!(h.notifier.names().is_empty());
        assert!(h.images.calls().is_empty());

        // The same email is still free
        let result = h
            .admins
            .create(Some(input("jane@example.com", h.role.id)))
            .await
            .unwrap();
        assert_eq!(result.admin.email, "jane@example.com");
    }
}

// ============================================================================
// Update
// ============================================================================

mod update {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_id_or_input_is_invalid_parameter() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let err = h
            .admins
            .update(None, Some(input("jane@example.com", h.role.id)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameters provided.");

        let err = h.admins.update(Some(existing.id), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameters provided.");
    }

    #[tokio::test]
    async fn test_unknown_admin_is_not_found() {
        let h = Harness::new().await;

        let err = h
            .admins
            .update(Some(42), Some(input("ghost@example.com", h.role.id)))
            .await
            .unwrap_err();

        assert_matches!(&err, AppError::NotFound(msg) if msg == "User not found.");
        assert!(h.notifier.names().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_leaves_admin_untouched() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let err = h
            .admins
            .update(
                Some(existing.id),
                Some(AdminInput {
                    name: Some("Renamed".to_string()),
                    ..input("jane@example.com", 999)
                }),
            )
            .await
            .unwrap_err();

        assert_matches!(&err, AppError::NotFound(msg) if msg == "Role not found.");
        let stored = h.db.admins().get_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(stored, existing);
        assert!(h.notifier.names().is_empty());
        assert!(h.images.calls().is_empty());
    }

    #[tokio::test]
    async fn test_own_email_is_not_taken() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let result = h
            .admins
            .update(
                Some(existing.id),
                Some(AdminInput {
                    status: Some(true),
                    ..input("JANE@example.com", h.role.id)
                }),
            )
            .await
            .unwrap();

        assert_eq!(result.message, "User updated successfully.");
        assert_eq!(result.admin.name, "Jane Admin");
    }

    #[tokio::test]
    async fn test_other_admins_email_is_taken() {
        let h = Harness::new().await;
        h.insert_admin("first@example.com", "secret1", true).await;
        let second = h.insert_admin("second@example.com", "secret1", true).await;

        let err = h
            .admins
            .update(Some(second.id), Some(input("first@example.com", h.role.id)))
            .await
            .unwrap_err();
        assert_matches!(&err, AppError::Validation(e) if e.has("email"));
    }

    #[tokio::test]
    async fn test_missing_status_deactivates() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let result = h
            .admins
            .update(Some(existing.id), Some(input("jane@example.com", h.role.id)))
            .await
            .unwrap();
        assert!(!result.admin.status);
    }

    #[tokio::test]
    async fn test_without_password_keeps_hash_and_skips_password_event() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let result = h
            .admins
            .update(Some(existing.id), Some(input("jane@example.com", h.role.id)))
            .await
            .unwrap();

        let stored = h.db.admins().get_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(stored.password, existing.password);
        assert_eq!(
            h.notifier.events(),
            vec![
                AdminEvent::UpdateBefore(existing.id),
                AdminEvent::UpdateAfter(result.admin),
            ]
        );
    }

    #[tokio::test]
    async fn test_password_change_is_announced() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        // No minimum length on update
        let result = h
            .admins
            .update(
                Some(existing.id),
                Some(AdminInput {
                    password: Some("abc".to_string()),
                    password_confirmation: Some("abc".to_string()),
                    status: Some(true),
                    ..input("jane@example.com", h.role.id)
                }),
            )
            .await
            .unwrap();

        let stored = h.db.admins().get_by_id(existing.id).await.unwrap().unwrap();
        assert!(bcrypt::verify("abc", stored.password.as_deref().unwrap()).unwrap());
        assert_eq!(
            h.notifier.names(),
            vec![
                "user.admin.update.before",
                "user.admin.update-password",
                "user.admin.update.after",
            ]
        );
        assert_eq!(h.notifier.events()[1], AdminEvent::UpdatePassword(result.admin));
    }

    #[tokio::test]
    async fn test_password_without_confirmation_is_rejected() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let err = h
            .admins
            .update(
                Some(existing.id),
                Some(AdminInput {
                    password: Some("newsecret".to_string()),
                    ..input("jane@example.com", h.role.id)
                }),
            )
            .await
            .unwrap_err();
        assert_matches!(&err, AppError::Validation(e) if e.has("password_confirmation"));
    }

    #[tokio::test]
    async fn test_image_is_attached_after_update() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let result = h
            .admins
            .update(
                Some(existing.id),
                Some(AdminInput {
                    image: Some("data:image/png;base64,AAAA".to_string()),
                    ..input("jane@example.com", h.role.id)
                }),
            )
            .await
            .unwrap();

        assert_eq!(h.images.calls().len(), 1);
        assert_eq!(h.images.calls()[0].owner_id, existing.id);
        assert!(result.admin.image.is_some());
    }

    #[tokio::test]
    async fn test_rejected_image_leaves_admin_unchanged() {
        let h = Harness::new().await;
        let existing = h.insert_admin("jane@example.com", "secret1", true).await;

        let err = h
            .admins
            .update(
                Some(existing.id),
                Some(AdminInput {
                    name: Some("Renamed".to_string()),
                    image: Some("data:text/plain;base64,aGVsbG8=".to_string()),
                    ..input("jane@example.com", h.role.id)
                }),
            )
            .await
            .unwrap_err();

        assert_matches!(&err, AppError::Validation(_));
        let stored = h.db.admins().get_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(stored, existing);
        assert!(h.notifier.names().is_empty());
    }
}

// ============================================================================
// Delete
// ============================================================================

mod delete {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_id_is_invalid_parameter() {
        let h = Harness::new().await;

        let err = h.admins.delete(None).await.unwrap_err();
        assert_matches!(&err, AppError::Validation(_));
    }

    #[tokio::test]
    async fn test_unknown_admin_is_not_found() {
        let h = Harness::new().await;
        h.insert_admin("jane@example.com", "secret1", true).await;

        let err = h.admins.delete(Some(999)).await.unwrap_err();
        assert_matches!(&err, AppError::NotFound(msg) if msg == "User not found.");
    }

    #[tokio::test]
    async fn test_last_admin_is_never_deleted() {
        let h = Harness::new().await;
        let only = h.insert_admin("jane@example.com", "secret1", true).await;

        let err = h.admins.delete(Some(only.id)).await.unwrap_err();

        assert_matches!(&err, AppError::Invariant(msg) if msg == "At least one admin is required.");
        assert_eq!(h.admin_count().await, 1);
        assert!(h.notifier.names().is_empty());
    }

    #[tokio::test]
    async fn test_delete_emits_events_around_removal() {
        let h = Harness::new().await;
        h.insert_admin("first@example.com", "secret1", true).await;
        let second = h.insert_admin("second@example.com", "secret1", true).await;

        let message = h.admins.delete(Some(second.id)).await.unwrap();

        assert_eq!(message, "User deleted successfully.");
        assert_eq!(h.admin_count().await, 1);
        assert_eq!(
            h.notifier.events(),
            vec![
                AdminEvent::DeleteBefore(second.id),
                AdminEvent::DeleteAfter(second.id),
            ]
        );
    }

    #[tokio::test]
    async fn test_deleting_down_to_one() {
        let h = Harness::new().await;
        let a = h.insert_admin("a@example.com", "secret1", true).await;
        let b = h.insert_admin("b@example.com", "secret1", true).await;
        let c = h.insert_admin("c@example.com", "secret1", true).await;

        h.admins.delete(Some(a.id)).await.unwrap();
        h.admins.delete(Some(b.id)).await.unwrap();
        let err = h.admins.delete(Some(c.id)).await.unwrap_err();

        assert_matches!(err, AppError::Invariant(_));
        assert_eq!(h.admin_count().await, 1);
    }
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_find_and_list() {
    let h = Harness::new().await;
    let a = h.insert_admin("a@example.com", "secret1", true).await;
    let b = h.insert_admin("b@example.com", "secret1", false).await;

    assert_eq!(h.admins.find(a.id).await.unwrap(), a);
    assert_eq!(h.admins.list().await.unwrap(), vec![a, b]);
    assert_matches!(h.admins.find(999).await, Err(AppError::NotFound(_)));

    let roles = h.admins.roles().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].permission_type, "all");
}
