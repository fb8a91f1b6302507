//! Unit tests for account recovery service

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::user::User;
use crate::domain::entities::verification_token::TokenPurpose;
use crate::errors::{AccountError, DomainError, ValidationError, VerificationError};
use crate::repositories::user::{InMemoryUserRepository, UserRepository};
use crate::repositories::verification_token::InMemoryVerificationTokenRepository;
use crate::services::account::uid::encode_uid;
use crate::services::account::{AccountRecoveryConfig, AccountRecoveryService, RecoveryDispatch};
use crate::services::clock::{Clock, ManualClock};
use crate::services::verification::{TokenVerificationService, VerificationServiceConfig};

use super::mocks::MockEmailService;

type Service = AccountRecoveryService<
    InMemoryUserRepository,
    InMemoryVerificationTokenRepository,
    ManualClock,
    MockEmailService,
>;

struct Fixture {
    service: Service,
    tokens: Arc<TokenVerificationService<InMemoryVerificationTokenRepository, ManualClock>>,
    users: Arc<InMemoryUserRepository>,
    email: Arc<MockEmailService>,
    clock: Arc<ManualClock>,
    user: User,
}

async fn setup() -> Fixture {
    setup_with_cost(4).await
}

async fn setup_with_cost(bcrypt_cost: u32) -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let tokens = Arc::new(InMemoryVerificationTokenRepository::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let email = Arc::new(MockEmailService::new(false));

    let user = users
        .insert(User::new("jane@example.com", "Jane", "old-hash".to_string()))
        .await
        .unwrap();

    let token_service = Arc::new(TokenVerificationService::new(
        tokens,
        clock.clone(),
        VerificationServiceConfig::default(),
    ));
    let config = AccountRecoveryConfig {
        frontend_base_url: "http://localhost:3000".to_string(),
        email_from: "no-reply@authapi.local".to_string(),
        bcrypt_cost,
    };

    let service =
        AccountRecoveryService::new(users.clone(), token_service.clone(), email.clone(), config);

    Fixture {
        service,
        tokens: token_service,
        users,
        email,
        clock,
        user,
    }
}

fn secret_of(dispatch: &RecoveryDispatch) -> String {
    dispatch.link.rsplit('/').next().unwrap().to_string()
}

#[tokio::test]
async fn test_send_password_reset_email() {
    let f = setup().await;

    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();

    assert!(dispatch.delivered);
    assert_eq!(dispatch.uid, encode_uid(f.user.id));
    assert!(dispatch
        .link
        .starts_with(&format!("http://localhost:3000/api/user/reset/{}/", dispatch.uid)));
    assert_eq!(secret_of(&dispatch).len(), 43);
    assert_eq!(dispatch.expires_at, f.clock.now() + Duration::minutes(15));

    let sent = f.email.last().unwrap();
    assert_eq!(sent.to, "jane@example.com");
    assert_eq!(sent.from, "no-reply@authapi.local");
    assert_eq!(sent.subject, "Reset Your Password");
    assert_eq!(
        sent.body,
        format!("Click Following Link to Reset Your Password {}", dispatch.link)
    );

    // The link never shows up in debug output
    assert!(!format!("{:?}", dispatch).contains(&secret_of(&dispatch)));
}

#[tokio::test]
async fn test_send_password_reset_email_normalizes_address() {
    let f = setup().await;

    let dispatch = f
        .service
        .send_password_reset_email("  jane@EXAMPLE.com ")
        .await
        .unwrap();
    assert_eq!(dispatch.uid, encode_uid(f.user.id));
}

#[tokio::test]
async fn test_send_password_reset_email_unknown_user() {
    let f = setup().await;

    let err = f
        .service
        .send_password_reset_email("nobody@example.com")
        .await
        .unwrap_err();

    match err {
        DomainError::Account(AccountError::UserNotFound) => {}
        other => panic!("Expected UserNotFound, got {:?}", other),
    }
    assert!(f.email.sent().is_empty());
}

#[tokio::test]
async fn test_send_password_reset_email_invalid_address() {
    let f = setup().await;

    let err = f.service.send_password_reset_email("not-an-email").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::InvalidEmail)
    ));

    let err = f.service.send_password_reset_email("   ").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::RequiredField { .. })
    ));
}

#[tokio::test]
async fn test_delivery_failure_does_not_fail_request() {
    let f = setup().await;
    f.email.set_failing(true);

    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
    assert!(!dispatch.delivered);

    // The issued token is still redeemable
    f.service
        .reset_password(&dispatch.uid, &secret_of(&dispatch), "NewPass123", "NewPass123")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_password_success_and_single_use() {
    let f = setup().await;
    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
    let secret = secret_of(&dispatch);

    f.service
        .reset_password(&dispatch.uid, &secret, "NewPass123", "NewPass123")
        .await
        .unwrap();

    let stored = f.users.find_by_id(f.user.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "old-hash");
    assert!(bcrypt::verify("NewPass123", &stored.password_hash).unwrap());

    let err = f
        .service
        .reset_password(&dispatch.uid, &secret, "Other123", "Other123")
        .await
        .unwrap_err();
    assert_eq!(
        err.as_verification(),
        Some(&VerificationError::AlreadyConsumed)
    );
}

#[tokio::test]
async fn test_reset_password_mismatch_keeps_token() {
    let f = setup().await;
    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
    let secret = secret_of(&dispatch);

    let err = f
        .service
        .reset_password(&dispatch.uid, &secret, "NewPass123", "NewPass124")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Account(AccountError::PasswordMismatch)));
    assert_eq!(err.to_string(), "Password and Confirm Password doesn't match");

    let err = f
        .service
        .reset_password(&dispatch.uid, &secret, "", "")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::RequiredField { .. })
    ));

    f.service
        .reset_password(&dispatch.uid, &secret, "NewPass123", "NewPass123")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_password_bad_uid() {
    let f = setup().await;
    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
    let secret = secret_of(&dispatch);

    let unknown_user = encode_uid(uuid::Uuid::new_v4());
    for uid in ["garbage!", "", unknown_user.as_str()] {
        let err = f
            .service
            .reset_password(uid, &secret, "NewPass123", "NewPass123")
            .await
            .unwrap_err();
        assert_eq!(err.as_verification(), Some(&VerificationError::NotFound));
    }
}

#[tokio::test]
async fn test_reset_password_expired_link() {
    let f = setup().await;
    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();

    f.clock.advance(Duration::minutes(16));

    let err = f
        .service
        .reset_password(&dispatch.uid, &secret_of(&dispatch), "NewPass123", "NewPass123")
        .await
        .unwrap_err();
    assert_eq!(err.as_verification(), Some(&VerificationError::Expired));

    let stored = f.users.find_by_id(f.user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "old-hash");
}

#[tokio::test]
async fn test_new_reset_email_invalidates_previous_link() {
    let f = setup().await;
    let first = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
    let second = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
    assert_eq!(f.email.sent().len(), 2);

    let err = f
        .service
        .reset_password(&first.uid, &secret_of(&first), "NewPass123", "NewPass123")
        .await
        .unwrap_err();
    assert_eq!(
        err.as_verification(),
        Some(&VerificationError::AlreadyConsumed)
    );

    f.service
        .reset_password(&second.uid, &secret_of(&second), "NewPass123", "NewPass123")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_email_verification_flow() {
    let f = setup().await;

    let dispatch = f.service.send_verification_email(f.user.id).await.unwrap();
    assert!(dispatch
        .link
        .starts_with(&format!("http://localhost:3000/api/user/verify-email/{}/", dispatch.uid)));
    assert_eq!(dispatch.expires_at, f.clock.now() + Duration::hours(24));

    let sent = f.email.last().unwrap();
    assert_eq!(sent.subject, "Verify Your Email");
    assert!(sent.body.ends_with(&dispatch.link));

    let user = f
        .service
        .confirm_email(&dispatch.uid, &secret_of(&dispatch))
        .await
        .unwrap();
    assert!(user.is_email_verified);
    assert!(f.users.find_by_id(f.user.id).await.unwrap().unwrap().is_email_verified);

    let err = f.service.send_verification_email(f.user.id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::EmailAlreadyVerified)
    ));
}

#[tokio::test]
async fn test_send_verification_email_unknown_user() {
    let f = setup().await;

    let err = f
        .service
        .send_verification_email(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Account(AccountError::UserNotFound)));
}

#[tokio::test]
async fn test_reset_token_cannot_confirm_email() {
    let f = setup().await;
    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();

    let err = f
        .service
        .confirm_email(&dispatch.uid, &secret_of(&dispatch))
        .await
        .unwrap_err();
    assert_eq!(err.as_verification(), Some(&VerificationError::NotFound));

    let user = f.users.find_by_id(f.user.id).await.unwrap().unwrap();
    assert!(!user.is_email_verified);
}

#[tokio::test]
async fn test_hashing_failure_keeps_reset_link_usable() {
    // bcrypt rejects costs above 31
    let f = setup_with_cost(40).await;

    let dispatch = f
        .service
        .send_password_reset_email("jane@example.com")
        .await
        .unwrap();
    let secret = secret_of(&dispatch);

    for _ in 0..2 {
        let err = f
            .service
            .reset_password(&dispatch.uid, &secret, "n3w-pass", "n3w-pass")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Account(AccountError::PasswordHashingFailed)
        ));
    }

    let stored = f.users.find_by_id(f.user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "old-hash");

    // The token was never consumed
    f.tokens
        .validate(
            &f.user.subject_id(),
            TokenPurpose::PasswordReset,
            &secret,
        )
        .await
        .unwrap();
}
