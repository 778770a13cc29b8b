//! Unit tests for token service

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::claims::{ClaimSet, EXP_CLAIM, SUB_CLAIM};
use crate::domain::entities::token::{IssuanceRequest, SigningKey};
use crate::errors::TokenError;
use crate::services::token::codec::{encode_segment, signing_input};
use crate::services::token::signature;
use crate::services::token::{Clock, FixedClock, TokenService};

const KEY: &str = "01234567890123456789012345678901";
const OTHER_KEY: &str = "abcdefghijklmnopqrstuvwxyz012345";
const NOW: i64 = 1_700_000_000;

fn create_test_service() -> (Arc<FixedClock>, TokenService<Arc<FixedClock>>) {
    let clock = Arc::new(FixedClock::new(NOW));
    (clock.clone(), TokenService::with_clock(clock))
}

/// Signs an arbitrary header and payload with `KEY`
fn forge(header: serde_json::Value, payload: serde_json::Value) -> String {
    let key = SigningKey::from_secret(KEY).unwrap();
    let message = signing_input(
        &encode_segment(&header).unwrap(),
        &encode_segment(&payload).unwrap(),
    );
    let signature = signature::sign(&key, message.as_bytes()).unwrap();
    format!("{}.{}", message, signature)
}

#[test]
fn test_issue_and_verify_concrete_scenario() {
    let (_, service) = create_test_service();
    let claims = ClaimSet::new().with("role", "admin");

    let token = service.issue(&claims, KEY, 3600, Some("svc")).unwrap();
    let verified = service.verify(token.as_str(), KEY).unwrap();

    let expected = ClaimSet::new()
        .with("role", "admin")
        .with(SUB_CLAIM, "svc")
        .with(EXP_CLAIM, NOW + 3600);
    assert_eq!(verified, expected);
}

#[test]
fn test_token_has_three_segments_and_hs256_header() {
    let (_, service) = create_test_service();
    let token = service.issue(&ClaimSet::new(), KEY, 60, None).unwrap();

    let segments: Vec<&str> = token.as_str().split('.').collect();
    assert_eq!(segments.len(), 3);
    // {"typ":"JWT","alg":"HS256"}
    assert_eq!(segments[0], "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9");
}

#[test]
fn test_round_trip_with_nested_claims() {
    let (_, service) = create_test_service();
    let claims = ClaimSet::new()
        .with("amber", "hammer")
        .with("version", 1.5)
        .with("active", true)
        .with("nothing", serde_json::Value::Null)
        .with("scopes", json!(["read", "write"]))
        .with("profile", json!({"name": "charix", "tags": {"team": "core"}}));

    let token = service.issue(&claims, KEY, 60, None).unwrap();
    let mut verified = service.verify(token.as_str(), KEY).unwrap();

    assert_eq!(verified.remove(EXP_CLAIM), Some(json!(NOW + 60)));
    assert_eq!(verified, claims);
}

#[test]
fn test_tampered_signature_is_rejected() {
    let (_, service) = create_test_service();
    let token = service
        .issue(&ClaimSet::new().with("role", "admin"), KEY, 3600, None)
        .unwrap();
    let signature_start = token.as_str().rfind('.').unwrap() + 1;

    for i in signature_start..token.as_str().len() {
        let mut bytes = token.as_str().as_bytes().to_vec();
        bytes[i] ^= 0x01;
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            service.verify(&tampered, KEY),
            Err(TokenError::SignatureInvalid),
            "flipped byte {}",
            i
        );
    }
}

#[test]
fn test_tampered_payload_is_rejected() {
    let (_, service) = create_test_service();
    let token = service
        .issue(&ClaimSet::new().with("role", "user"), KEY, 3600, None)
        .unwrap();
    let parts: Vec<&str> = token.as_str().split('.').collect();

    let forged_payload = encode_segment(&json!({"role": "admin", "exp": NOW + 3600})).unwrap();
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_eq!(service.verify(&forged, KEY), Err(TokenError::SignatureInvalid));
}

#[test]
fn test_wrong_key_is_rejected() {
    let (_, service) = create_test_service();
    let token = service.issue(&ClaimSet::new(), KEY, 3600, None).unwrap();

    assert_eq!(
        service.verify(token.as_str(), OTHER_KEY),
        Err(TokenError::SignatureInvalid)
    );
}

#[test]
fn test_expiration_boundaries() {
    let (clock, service) = create_test_service();
    let token = service.issue(&ClaimSet::new(), KEY, 1, None).unwrap();

    assert!(service.verify(token.as_str(), KEY).is_ok());

    clock.advance(1);
    assert_eq!(service.verify(token.as_str(), KEY), Err(TokenError::Expired));

    clock.set(NOW + 2);
    assert_eq!(service.verify(token.as_str(), KEY), Err(TokenError::Expired));

    // Verification never mutates anything: going back in time makes it valid again
    clock.set(NOW);
    assert!(service.verify(token.as_str(), KEY).is_ok());
}

#[test]
fn test_issue_key_length_enforced() {
    let (_, service) = create_test_service();
    let claims = ClaimSet::new();

    let short = service.issue(&claims, &KEY[..31], 60, None);
    let long = service.issue(&claims, format!("{}x", KEY), 60, None);
    let exact = service.issue(&claims, KEY, 60, None);

    assert!(matches!(short, Err(TokenError::InvalidParameter { .. })));
    assert!(matches!(long, Err(TokenError::InvalidParameter { .. })));
    assert!(exact.is_ok());
}

#[test]
fn test_issue_key_length_counts_bytes() {
    let (_, service) = create_test_service();
    // 32 characters but 33 bytes
    let key = format!("ü{}", &KEY[..31]);

    assert!(matches!(
        service.issue(&ClaimSet::new(), &key, 60, None),
        Err(TokenError::InvalidParameter { .. })
    ));
}

#[test]
fn test_issue_rejects_non_positive_expiration() {
    let (_, service) = create_test_service();

    for expiration in [0, -1, i64::MIN] {
        assert!(matches!(
            service.issue(&ClaimSet::new(), KEY, expiration, None),
            Err(TokenError::InvalidParameter { .. })
        ));
    }
}

#[test]
fn test_issue_rejects_expiration_overflow() {
    let clock = FixedClock::new(i64::MAX - 10);
    let service = TokenService::with_clock(&clock);

    assert!(matches!(
        service.issue(&ClaimSet::new(), KEY, 100, None),
        Err(TokenError::InvalidParameter { .. })
    ));
}

#[test]
fn test_verify_invalid_parameters() {
    let (_, service) = create_test_service();
    let token = service.issue(&ClaimSet::new(), KEY, 60, None).unwrap();

    assert!(matches!(
        service.verify("", KEY),
        Err(TokenError::InvalidParameter { .. })
    ));
    assert!(matches!(
        service.verify(token.as_str(), &KEY[..31]),
        Err(TokenError::InvalidParameter { .. })
    ));
}

#[test]
fn test_verify_malformed_tokens() {
    let (_, service) = create_test_service();

    for token in ["not-a-token", "a.b", "a.b.c", "a.b.c.d", "..", "   "] {
        assert_eq!(
            service.verify(token, KEY),
            Err(TokenError::MalformedToken),
            "{:?}",
            token
        );
    }
}

#[test]
fn test_verify_rejects_other_algorithms() {
    let (_, service) = create_test_service();
    let payload = json!({"exp": NOW + 60});

    let hs512 = forge(json!({"typ": "JWT", "alg": "HS512"}), payload.clone());
    let none = forge(json!({"typ": "JWT", "alg": "none"}), payload.clone());
    let missing = forge(json!({"typ": "JWT"}), payload);

    assert_eq!(service.verify(&hs512, KEY), Err(TokenError::MalformedToken));
    assert_eq!(service.verify(&none, KEY), Err(TokenError::MalformedToken));
    assert_eq!(service.verify(&missing, KEY), Err(TokenError::MalformedToken));
}

#[test]
fn test_verify_signed_payload_problems() {
    let (_, service) = create_test_service();
    let header = json!({"typ": "JWT", "alg": "HS256"});

    let no_exp = forge(header.clone(), json!({"role": "admin"}));
    let text_exp = forge(header.clone(), json!({"exp": "tomorrow"}));
    let not_object = forge(header.clone(), json!(["exp", NOW + 60]));
    let half_second_left = forge(header.clone(), json!({"exp": NOW as f64 + 0.5}));
    let half_second_ago = forge(header.clone(), json!({"exp": NOW as f64 - 0.5}));
    let far_future = forge(header, json!({"exp": u64::MAX}));

    assert_eq!(service.verify(&no_exp, KEY), Err(TokenError::Expired));
    assert_eq!(service.verify(&text_exp, KEY), Err(TokenError::MalformedToken));
    assert_eq!(service.verify(&not_object, KEY), Err(TokenError::MalformedToken));
    assert!(service.verify(&half_second_left, KEY).is_ok());
    assert_eq!(service.verify(&half_second_ago, KEY), Err(TokenError::Expired));

    let verified = service.verify(&far_future, KEY).unwrap();
    assert_eq!(verified.get(EXP_CLAIM), Some(&json!(u64::MAX)));
}

#[test]
fn test_clock_accessor_tracks_shared_clock() {
    let (clock, service) = create_test_service();
    assert_eq!(service.clock().now(), NOW);

    clock.advance(30);
    assert_eq!(service.clock().now(), NOW + 30);
}

#[test]
fn test_caller_exp_is_replaced() {
    let (_, service) = create_test_service();
    let claims = ClaimSet::new().with(EXP_CLAIM, NOW + 999_999);

    let token = service.issue(&claims, KEY, 10, None).unwrap();
    let verified = service.verify(token.as_str(), KEY).unwrap();

    assert_eq!(verified.expiration(), Some(Some(NOW + 10)));
}

#[test]
fn test_subject_handling() {
    let (_, service) = create_test_service();
    let claims = ClaimSet::new().with(SUB_CLAIM, "caller");

    let kept = service.issue(&claims, KEY, 10, None).unwrap();
    let replaced = service.issue(&claims, KEY, 10, Some("svc")).unwrap();
    let absent = service.issue(&ClaimSet::new(), KEY, 10, None).unwrap();

    assert_eq!(service.verify(kept.as_str(), KEY).unwrap().subject(), Some("caller"));
    assert_eq!(service.verify(replaced.as_str(), KEY).unwrap().subject(), Some("svc"));
    assert!(!service.verify(absent.as_str(), KEY).unwrap().contains_key(SUB_CLAIM));
}

#[test]
fn test_issue_is_deterministic_for_same_clock() {
    let (clock, service) = create_test_service();
    let claims = ClaimSet::new().with("b", 2).with("a", 1);
    let reordered = ClaimSet::new().with("a", 1).with("b", 2);

    let first = service.issue(&claims, KEY, 60, Some("svc")).unwrap();
    let second = service.issue(&reordered, KEY, 60, Some("svc")).unwrap();
    assert_eq!(first, second);

    clock.advance(1);
    let later = service.issue(&claims, KEY, 60, Some("svc")).unwrap();
    assert_ne!(first, later);
}

#[test]
fn test_issue_request_matches_issue() {
    let (_, service) = create_test_service();
    let claims = ClaimSet::new().with("role", "admin");
    let request = IssuanceRequest::new(claims.clone(), SigningKey::from_secret(KEY).unwrap(), 3600)
        .with_subject("svc");

    let from_request = service.issue_request(&request).unwrap();
    let direct = service.issue(&claims, KEY, 3600, Some("svc")).unwrap();
    assert_eq!(from_request, direct);

    let invalid = IssuanceRequest {
        expiration_seconds: 0,
        ..request
    };
    assert!(matches!(
        service.issue_request(&invalid),
        Err(TokenError::InvalidParameter { .. })
    ));
}

#[test]
fn test_verify_accepts_signing_key_value() {
    let (_, service) = create_test_service();
    let key = SigningKey::from_secret(KEY).unwrap();
    let token = service.issue(&ClaimSet::new(), &key, 60, None).unwrap();

    assert!(service.verify(token.as_str(), &key).is_ok());
    assert!(service.verify(token.as_str(), KEY.as_bytes()).is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issue_and_verify() {
    let (_, service) = create_test_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let claims = ClaimSet::new().with("worker", i);
                let token = service.issue(&claims, KEY, 60, None).unwrap();
                service.verify(token.as_str(), KEY).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let claims = handle.await.unwrap();
        assert_eq!(claims.get("worker"), Some(&json!(i)));
    }
}
