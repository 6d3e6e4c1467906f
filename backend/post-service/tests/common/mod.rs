//! Behavioural checks every `PostRepository` backend must pass.
//!
//! Each scenario starts from an empty store.

#![allow(dead_code)]

use post_service::{ErrorKind, PageRequest, PostRepository, MAX_COMMENT_LENGTH};
use std::collections::HashSet;

fn ids<'a>(items: impl IntoIterator<Item = &'a post_service::Comment>) -> HashSet<String> {
    items.into_iter().map(|c| c.id.clone()).collect()
}

pub async fn create_then_get_returns_same_post(repo: &dyn PostRepository) {
    let created = repo.create_post("Title", "Body", true).await.unwrap();
    let fetched = repo.get_post_by_id(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let closed = repo.create_post("Closed", "", false).await.unwrap();
    assert_ne!(closed.id, created.id);
    assert_eq!(repo.get_post_by_id(&closed.id).await.unwrap(), closed);

    let posts = repo.get_posts().await.unwrap();
    assert_eq!(posts, vec![created, closed]);
}

pub async fn unknown_post_is_not_found(repo: &dyn PostRepository) {
    for id in ["12345", "not-a-number"] {
        let err = repo.get_post_by_id(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = repo.create_comment(id, None, "hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = repo
            .get_comments_by_post(id, PageRequest::All)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

pub async fn comments_disabled_is_failed_precondition(repo: &dyn PostRepository) {
    let post = repo.create_post("Title", "Body", false).await.unwrap();

    let err = repo
        .create_comment(&post.id, Some(String::new()), "hi")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);

    let comments = repo
        .get_comments_by_post(&post.id, PageRequest::All)
        .await
        .unwrap();
    assert!(comments.is_empty());
}

pub async fn content_length_is_limited(repo: &dyn PostRepository) {
    let post = repo.create_post("Title", "Body", true).await.unwrap();

    let err = repo
        .create_comment(&post.id, None, &"x".repeat(MAX_COMMENT_LENGTH + 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    // Multi-byte characters count once each
    let at_limit = "ü".repeat(MAX_COMMENT_LENGTH);
    let comment = repo.create_comment(&post.id, None, &at_limit).await.unwrap();
    assert_eq!(comment.content, at_limit);
}

pub async fn threaded_comments(repo: &dyn PostRepository) {
    let post = repo.create_post("Title", "Body", true).await.unwrap();
    let c1 = repo.create_comment(&post.id, None, "C1").await.unwrap();
    let c2 = repo
        .create_comment(&post.id, Some(c1.id.clone()), "C2")
        .await
        .unwrap();

    assert!(c1.is_top_level());
    assert_eq!(c2.parent_id.as_deref(), Some(c1.id.as_str()));
    assert_eq!(c2.post_id, post.id);

    let children = repo.get_children_comments(&c1.id).await.unwrap();
    assert_eq!(children, vec![c2.clone()]);

    let page = repo
        .get_comments_by_post(&post.id, PageRequest::page(1, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(ids(&page), ids([&c1, &c2]));

    assert!(repo.get_children_comments(&c2.id).await.unwrap().is_empty());
}

pub async fn unknown_parent_is_not_found(repo: &dyn PostRepository) {
    let post = repo.create_post("Title", "Body", true).await.unwrap();

    let err = repo
        .create_comment(&post.id, Some("4242".to_string()), "reply")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = repo
        .create_comment(&post.id, Some("garbage".to_string()), "reply")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

pub async fn children_lookup_normalizes_ids(repo: &dyn PostRepository) {
    let post = repo.create_post("Title", "Body", true).await.unwrap();
    let parent = repo.create_comment(&post.id, None, "parent").await.unwrap();
    let reply = repo
        .create_comment(&post.id, Some(format!("0{}", parent.id)), "reply")
        .await
        .unwrap();
    assert_eq!(reply.parent_id.as_deref(), Some(parent.id.as_str()));

    let padded = repo
        .get_children_comments(&format!("0{}", parent.id))
        .await
        .unwrap();
    assert_eq!(padded, vec![reply.clone()]);
    assert_eq!(
        repo.get_children_comments(&parent.id).await.unwrap(),
        vec![reply]
    );
    assert!(repo
        .get_children_comments("not-a-number")
        .await
        .unwrap()
        .is_empty());
}

pub async fn reply_on_other_post_is_rejected(repo: &dyn PostRepository) {
    let a = repo.create_post("A", "Body", true).await.unwrap();
    let b = repo.create_post("B", "Body", true).await.unwrap();
    let on_a = repo.create_comment(&a.id, None, "on a").await.unwrap();

    let err = repo
        .create_comment(&b.id, Some(on_a.id.clone()), "stray reply")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    assert!(repo.get_children_comments(&on_a.id).await.unwrap().is_empty());
    assert!(repo
        .get_comments_by_post(&b.id, PageRequest::All)
        .await
        .unwrap()
        .is_empty());
}

pub async fn pagination_slices_in_id_order(repo: &dyn PostRepository) {
    let post = repo.create_post("Title", "Body", true).await.unwrap();
    let other = repo.create_post("Other", "Body", true).await.unwrap();

    let mut created = Vec::new();
    for i in 0..7 {
        created.push(
            repo.create_comment(&post.id, None, &format!("comment {i}"))
                .await
                .unwrap(),
        );
        repo.create_comment(&other.id, None, "noise").await.unwrap();
    }

    let all = repo
        .get_comments_by_post(&post.id, PageRequest::All)
        .await
        .unwrap();
    assert_eq!(all, created);
    assert_eq!(repo.count_comments_by_post(&post.id).await.unwrap(), 7);

    // ceil(7 / 3) = 3 pages, the last holding 7 mod 3 = 1 comment
    let mut seen = Vec::new();
    for page in 1..=3 {
        let chunk = repo
            .get_comments_by_post(&post.id, PageRequest::page(page, 3).unwrap())
            .await
            .unwrap();
        assert_eq!(chunk.len(), if page == 3 { 1 } else { 3 });
        seen.extend(chunk);
    }
    assert_eq!(seen, created);

    let raw = repo.get_comments_paged(&post.id, -1, -1).await.unwrap();
    assert_eq!(raw.len(), 7);

    let err = repo.get_comments_paged(&post.id, 0, 3).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = repo.get_comments_paged(&post.id, 1, -1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

/// Pages past the end under the default policy
pub async fn out_of_range_page_is_empty(repo: &dyn PostRepository) {
    let post = repo.create_post("Title", "Body", true).await.unwrap();
    for i in 0..4 {
        repo.create_comment(&post.id, None, &format!("comment {i}"))
            .await
            .unwrap();
    }

    let page = repo
        .get_comments_by_post(&post.id, PageRequest::page(3, 2).unwrap())
        .await
        .unwrap();
    assert!(page.is_empty());

    let empty_post = repo.create_post("Quiet", "Body", true).await.unwrap();
    let first = repo
        .get_comments_by_post(&empty_post.id, PageRequest::page(1, 10).unwrap())
        .await
        .unwrap();
    assert!(first.is_empty());
}
