use tweetline_core::{Comment, Identity, ModelValidationError, Tweet};

fn bob() -> Identity {
    Identity::new("principal-bob")
}

#[test]
fn tweet_new_sets_zeroed_engagement_state() {
    let tweet = Tweet::new("t-1", bob(), "hello", "bob", 1_000).unwrap();

    assert_eq!(tweet.id, "t-1");
    assert_eq!(tweet.owner, bob());
    assert_eq!(tweet.likes, 0);
    assert!(tweet.liked_by.is_empty());
    assert!(tweet.comments.is_empty());
    assert_eq!(tweet.created_at, 1_000);
    assert_eq!(tweet.updated_at, None);
}

#[test]
fn tweet_new_rejects_blank_text_fields() {
    assert_eq!(
        Tweet::new("t-1", bob(), "  ", "bob", 1).unwrap_err(),
        ModelValidationError::BlankContent
    );
    assert_eq!(
        Tweet::new("t-1", bob(), "hi", "", 1).unwrap_err(),
        ModelValidationError::BlankUsername
    );
    assert_eq!(
        Tweet::new("", bob(), "hi", "bob", 1).unwrap_err(),
        ModelValidationError::BlankId
    );
}

#[test]
fn validate_rejects_duplicate_comment_ids() {
    let carol = Identity::new("principal-carol");
    let comment = Comment::new("c-1", carol, "hey", "carol", 2).unwrap();
    let tweet = Tweet::new("t-1", bob(), "hello", "bob", 1)
        .unwrap()
        .with_comment(comment.clone())
        .with_comment(comment);

    assert_eq!(
        tweet.validate().unwrap_err(),
        ModelValidationError::DuplicateCommentId("c-1".to_string())
    );
}

#[test]
fn validate_rejects_edit_stamp_before_creation() {
    let tweet = Tweet::new("t-1", bob(), "hello", "bob", 5_000)
        .unwrap()
        .with_content("edited", 4_000);

    assert_eq!(
        tweet.validate().unwrap_err(),
        ModelValidationError::UpdatedBeforeCreated {
            created_at: 5_000,
            updated_at: 4_000,
        }
    );
}

#[test]
fn tweet_serialization_uses_expected_wire_fields() {
    let alice = Identity::new("principal-alice");
    let comment = Comment::new("c-1", alice.clone(), "nice", "alice", 2_000).unwrap();
    let tweet = Tweet::new("t-1", bob(), "hello", "bob", 1_000)
        .unwrap()
        .with_like(&alice)
        .unwrap()
        .with_comment(comment);

    let json = serde_json::to_value(&tweet).unwrap();
    assert_eq!(json["id"], "t-1");
    assert_eq!(json["owner"], "principal-bob");
    assert_eq!(json["likes"], 1);
    assert_eq!(json["liked_by"], serde_json::json!(["principal-alice"]));
    assert_eq!(json["comments"][0]["owner"], "principal-alice");
    assert_eq!(json["created_at"], 1_000);
    assert!(json["updated_at"].is_null());

    let decoded: Tweet = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, tweet);
}

#[test]
fn identities_compare_by_value() {
    assert_eq!(Identity::new("x"), Identity::from("x"));
    assert_ne!(Identity::new("x"), Identity::new("y"));
    assert_eq!(Identity::new("x").to_string(), "x");
}
