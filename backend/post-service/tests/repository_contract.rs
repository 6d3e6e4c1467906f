//! Contract scenarios against the in-memory backend, bare and wrapped.

mod common;

use post_service::{
    ErrorKind, InMemoryPostRepository, OutOfRangePolicy, PageRequest, PostRepository,
    ValidatedPostRepository,
};
use std::sync::Arc;

fn memory() -> InMemoryPostRepository {
    InMemoryPostRepository::new()
}

fn validated() -> ValidatedPostRepository {
    ValidatedPostRepository::new(Arc::new(InMemoryPostRepository::new()))
}

macro_rules! contract_tests {
    ($($name:ident),* $(,)?) => {
        mod in_memory {
            $(
                #[tokio::test]
                async fn $name() {
                    crate::common::$name(&crate::memory()).await;
                }
            )*
        }

        mod validated {
            $(
                #[tokio::test]
                async fn $name() {
                    crate::common::$name(&crate::validated()).await;
                }
            )*
        }
    };
}

contract_tests!(
    create_then_get_returns_same_post,
    unknown_post_is_not_found,
    comments_disabled_is_failed_precondition,
    content_length_is_limited,
    threaded_comments,
    unknown_parent_is_not_found,
    children_lookup_normalizes_ids,
    reply_on_other_post_is_rejected,
    pagination_slices_in_id_order,
    out_of_range_page_is_empty,
);

#[tokio::test]
async fn test_reject_policy_reports_out_of_range() {
    let repo = ValidatedPostRepository::new(Arc::new(InMemoryPostRepository::new()))
        .with_out_of_range_policy(OutOfRangePolicy::Reject);

    let post = repo.create_post("Title", "Body", true).await.unwrap();
    for i in 0..3 {
        repo.create_comment(&post.id, None, &format!("comment {i}"))
            .await
            .unwrap();
    }

    let last = repo
        .get_comments_by_post(&post.id, PageRequest::page(2, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(last.len(), 1);

    let err = repo
        .get_comments_by_post(&post.id, PageRequest::page(3, 2).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);

    // The first page of an empty thread is a valid empty page
    let quiet = repo.create_post("Quiet", "Body", true).await.unwrap();
    let first = repo
        .get_comments_by_post(&quiet.id, PageRequest::page(1, 5).unwrap())
        .await
        .unwrap();
    assert!(first.is_empty());
}

#[tokio::test]
async fn test_shared_repository_across_tasks() {
    let repo: Arc<dyn PostRepository> = Arc::new(validated());
    let post = repo.create_post("Busy", "Body", true).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let repo = Arc::clone(&repo);
        let post_id = post.id.clone();
        handles.push(tokio::spawn(async move {
            repo.create_comment(&post_id, None, &format!("comment {i}"))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let all = repo
        .get_comments_by_post(&post.id, PageRequest::All)
        .await
        .unwrap();
    assert_eq!(all.len(), 16);

    let mut ids: Vec<u64> = all.iter().map(|c| c.id.parse().unwrap()).collect();
    let sorted = {
        let mut copy = ids.clone();
        copy.sort_unstable();
        copy
    };
    assert_eq!(ids, sorted);
    ids.dedup();
    assert_eq!(ids.len(), 16);
}
