//! Unit tests for token verification service

use chrono::{Duration, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::domain::entities::verification_token::TokenPurpose;
use crate::errors::{DomainError, VerificationError};
use crate::repositories::verification_token::{
    InMemoryVerificationTokenRepository, VerificationTokenRepository,
};
use crate::services::clock::{Clock, ManualClock};
use crate::services::verification::{
    TokenVerificationService, VerificationServiceConfig, MAX_SUBJECT_ID_LENGTH,
};

use super::mocks::FlakyTokenRepository;

type Service = TokenVerificationService<InMemoryVerificationTokenRepository, ManualClock>;

fn setup() -> (Service, Arc<InMemoryVerificationTokenRepository>, Arc<ManualClock>) {
    let repo = Arc::new(InMemoryVerificationTokenRepository::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = TokenVerificationService::new(
        repo.clone(),
        clock.clone(),
        VerificationServiceConfig::default(),
    );
    (service, repo, clock)
}

fn verification_error(err: DomainError) -> VerificationError {
    match err {
        DomainError::Verification(e) => e,
        other => panic!("Expected verification error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_sets_expiry_from_clock() {
    let (service, repo, clock) = setup();

    let issued = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    assert_eq!(issued.token.issued_at, clock.now());
    assert_eq!(issued.token.expires_at, issued.token.issued_at + Duration::minutes(15));
    assert!(!issued.token.consumed);
    assert_eq!(issued.secret.len(), 43);
    // Only the digest is stored
    assert_ne!(issued.token.secret_hash, issued.secret);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_issue_rejects_invalid_arguments() {
    let (service, repo, _) = setup();

    for ttl in [Duration::zero(), Duration::seconds(-5)] {
        let err = service
            .issue("user-42", TokenPurpose::PasswordReset, ttl)
            .await
            .unwrap_err();
        assert!(matches!(
            verification_error(err),
            VerificationError::InvalidArgument { .. }
        ));
    }

    for subject in ["", "   "] {
        let err = service
            .issue(subject, TokenPurpose::EmailVerification, Duration::hours(1))
            .await
            .unwrap_err();
        assert!(matches!(
            verification_error(err),
            VerificationError::InvalidArgument { .. }
        ));
    }

    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_issue_rejects_overflowing_ttl() {
    let (service, repo, _) = setup();

    // Roughly 300k years, past the last representable timestamp
    let err = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::weeks(52 * 300_000))
        .await
        .unwrap_err();
    assert!(matches!(
        verification_error(err),
        VerificationError::InvalidArgument { .. }
    ));
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_issue_rejects_overlong_subject() {
    let (service, repo, _) = setup();

    let longest = "a".repeat(MAX_SUBJECT_ID_LENGTH);
    service
        .issue(&longest, TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    let too_long = "a".repeat(MAX_SUBJECT_ID_LENGTH + 1);
    let err = service
        .issue(&too_long, TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap_err();
    assert!(matches!(
        verification_error(err),
        VerificationError::InvalidArgument { .. }
    ));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_issue_with_default_ttl() {
    let (service, _, _) = setup();

    let reset = service
        .issue_with_default_ttl("user-42", TokenPurpose::PasswordReset)
        .await
        .unwrap();
    assert_eq!(reset.token.expires_at - reset.token.issued_at, Duration::minutes(15));

    let verify = service
        .issue_with_default_ttl("user-42", TokenPurpose::EmailVerification)
        .await
        .unwrap();
    assert_eq!(verify.token.expires_at - verify.token.issued_at, Duration::hours(24));
}

#[tokio::test]
async fn test_validate_succeeds_exactly_once() {
    let (service, _, _) = setup();
    let issued = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    let validated = service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .unwrap();
    assert_eq!(validated.id, issued.token.id);
    assert!(validated.consumed);
    assert!(validated.consumed_at.is_some());

    let err = service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::AlreadyConsumed);
}

#[tokio::test]
async fn test_validate_unknown_secret() {
    let (service, _, _) = setup();
    let issued = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    for secret in ["", "not-a-real-secret"] {
        let err = service
            .validate("user-42", TokenPurpose::PasswordReset, secret)
            .await
            .unwrap_err();
        assert_eq!(verification_error(err), VerificationError::NotFound);
    }

    let oversized = "a".repeat(10_000);
    let err = service
        .validate("user-42", TokenPurpose::PasswordReset, &oversized)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::NotFound);

    // Right secret, wrong subject
    let err = service
        .validate("user-43", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::NotFound);

    // The real token is still usable
    assert!(service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_validate_expiry_boundary() {
    let (service, _, clock) = setup();
    let issued = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    // Valid up to and including expires_at
    clock.set(issued.token.expires_at);
    assert!(service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_validate_expired_token_is_consumed() {
    let (service, repo, clock) = setup();
    let issued = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    clock.advance(Duration::minutes(15) + Duration::seconds(1));

    let err = service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::Expired);

    let stored = repo.get(issued.token.id).await.unwrap();
    assert!(stored.consumed);

    // Expired wins over consumed on repeat
    let err = service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::Expired);
}

#[tokio::test]
async fn test_reissue_supersedes_previous_secret() {
    let (service, _, _) = setup();
    let first = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();
    let second = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();
    assert_ne!(first.secret, second.secret);

    let err = service
        .validate("user-42", TokenPurpose::PasswordReset, &first.secret)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::AlreadyConsumed);

    assert!(service
        .validate("user-42", TokenPurpose::PasswordReset, &second.secret)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_purposes_are_independent() {
    let (service, _, _) = setup();
    let reset = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();
    let verify = service
        .issue("user-42", TokenPurpose::EmailVerification, Duration::hours(24))
        .await
        .unwrap();

    // A secret never validates under another purpose
    let err = service
        .validate("user-42", TokenPurpose::EmailVerification, &reset.secret)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::NotFound);

    assert!(service
        .validate("user-42", TokenPurpose::PasswordReset, &reset.secret)
        .await
        .is_ok());
    assert!(service
        .validate("user-42", TokenPurpose::EmailVerification, &verify.secret)
        .await
        .is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_validate_single_winner() {
    let (service, _, _) = setup();
    let service = Arc::new(service);
    let issued = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            let secret = issued.secret.clone();
            tokio::spawn(async move {
                service
                    .validate("user-42", TokenPurpose::PasswordReset, &secret)
                    .await
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    let mut successes = 0;
    for result in results {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert_eq!(verification_error(err), VerificationError::AlreadyConsumed),
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_storage_failures_propagate() {
    let repo = Arc::new(FlakyTokenRepository::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = TokenVerificationService::new(
        repo.clone(),
        clock.clone(),
        VerificationServiceConfig::default(),
    );

    repo.fail_writes.store(true, Ordering::SeqCst);
    let err = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));

    repo.fail_writes.store(false, Ordering::SeqCst);
    let issued = service
        .issue("user-42", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();

    repo.fail_reads.store(true, Ordering::SeqCst);
    let err = service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
    repo.fail_reads.store(false, Ordering::SeqCst);

    // A failed consume on an expired token still reports Expired
    clock.advance(Duration::hours(1));
    repo.fail_writes.store(true, Ordering::SeqCst);
    let err = service
        .validate("user-42", TokenPurpose::PasswordReset, &issued.secret)
        .await
        .unwrap_err();
    assert_eq!(verification_error(err), VerificationError::Expired);
}

#[tokio::test]
async fn test_purge_expired() {
    let (service, repo, clock) = setup();
    service
        .issue("user-1", TokenPurpose::PasswordReset, Duration::minutes(15))
        .await
        .unwrap();
    service
        .issue("user-2", TokenPurpose::EmailVerification, Duration::hours(24))
        .await
        .unwrap();

    clock.advance(Duration::hours(1));
    assert_eq!(service.purge_expired().await.unwrap(), 1);
    assert_eq!(repo.len().await, 1);
    assert_eq!(
        repo.count_live("user-2", TokenPurpose::EmailVerification, clock.now())
            .await
            .unwrap(),
        1
    );
}
