//! End-to-end workflow tests: core services over the in-memory store.

#![cfg(feature = "auth")]

use std::sync::Arc;

use quill_core::domain::{PostDraft, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, TagRepository};
use quill_core::service::{AccountService, CommentService, NO_TAG_SLUG, PostService, Registration};
use quill_core::{DomainError, Principal};
use uuid::Uuid;

use quill_infra::{
    Argon2PasswordService, InMemorySessionStore, InMemoryStore, JwtConfig, JwtTokenService,
};

struct Harness {
    store: Arc<InMemoryStore>,
    accounts: AccountService,
    posts: PostService,
    comments: CommentService,
}

fn harness(page_size: u64) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "workflow-secret".to_string(),
        ..JwtConfig::default()
    });
    let passwords = Argon2PasswordService::with_cost(1024, 1, 1).unwrap();

    Harness {
        accounts: AccountService::new(
            store.clone(),
            Arc::new(InMemorySessionStore::default()),
            Arc::new(tokens),
            Arc::new(passwords),
        ),
        posts: PostService::new(store.clone(), store.clone(), store.clone(), page_size),
        comments: CommentService::new(store.clone(), store.clone()),
        store,
    }
}

impl Harness {
    /// Register `name` and log in, returning the user and the bearer token.
    async fn sign_up(&self, name: &str) -> (User, String) {
        let user = self
            .accounts
            .register(Registration {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        let outcome = self.accounts.login(name, "password123").await.unwrap();
        (user, outcome.token)
    }

    async fn principal(&self, token: &str) -> Principal {
        self.accounts.resolve(Some(token)).await.unwrap()
    }
}

fn draft(title: &str, content: &str, tags: Option<&str>) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.map(str::to_string),
        ..Default::default()
    }
}

fn tag_names(view: &quill_core::service::PostView) -> Vec<&str> {
    view.tags.iter().map(|t| t.tag_name.as_str()).collect()
}

#[tokio::test]
async fn create_sets_author_from_principal() {
    let h = harness(5);
    let (alice, token) = h.sign_up("alice").await;
    let principal = h.principal(&token).await;

    let view = h
        .posts
        .create(&principal, draft("hello", "world", Some("a, b")))
        .await
        .unwrap();

    assert_eq!(view.post.author_id(), alice.id);
    assert_eq!(tag_names(&view), vec!["a", "b"]);
}

#[tokio::test]
async fn anonymous_cannot_create_and_store_is_untouched() {
    let h = harness(5);

    let result = h
        .posts
        .create(&Principal::Anonymous, draft("nope", "", Some("ghost")))
        .await;

    assert!(matches!(result, Err(DomainError::Unauthenticated)));
    assert_eq!(h.posts.list(1).await.unwrap().total, 0);
    assert!(h.store.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn inactive_user_cannot_create() {
    let h = harness(5);
    let (mut alice, token) = h.sign_up("alice").await;
    alice.is_active = false;
    BaseRepository::<User, Uuid>::save(h.store.as_ref(), alice)
        .await
        .unwrap();

    let principal = h.principal(&token).await;
    let result = h.posts.create(&principal, draft("t", "c", None)).await;

    assert!(matches!(result, Err(DomainError::PermissionDenied(_))));
}

#[tokio::test]
async fn delimiter_variants_yield_the_same_tag_set() {
    let h = harness(5);
    let (_, token) = h.sign_up("alice").await;
    let principal = h.principal(&token).await;

    let mut sets = Vec::new();
    for input in ["x; y, z", " x ,y;z ", ";;x,,y ; z;"] {
        let view = h
            .posts
            .create(&principal, draft("t", "c", Some(input)))
            .await
            .unwrap();
        sets.push(view.tags.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    assert!(sets.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(h.store.all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn concurrent_creates_share_one_new_tag() {
    let h = Arc::new(harness(5));
    let (_, token) = h.sign_up("alice").await;
    let principal = h.principal(&token).await;

    let creates = (0..8).map(|i| {
        let h = h.clone();
        let principal = principal.clone();
        async move {
            h.posts
                .create(&principal, draft(&format!("post {i}"), "", Some("brand-new")))
                .await
                .unwrap()
        }
    });
    let views = futures::future::join_all(creates).await;

    let first = views[0].tags[0].id;
    assert!(views.iter().all(|v| v.tags.len() == 1 && v.tags[0].id == first));
    assert_eq!(h.store.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_replaces_tags() {
    let h = harness(5);
    let (_, token) = h.sign_up("alice").await;
    let principal = h.principal(&token).await;

    let created = h
        .posts
        .create(&principal, draft("t", "c", Some("a; b")))
        .await
        .unwrap();
    let updated = h
        .posts
        .update(&principal, created.post.id, draft("t2", "c2", Some("c")))
        .await
        .unwrap();

    assert_eq!(tag_names(&updated), vec!["c"]);
    let detail = h.posts.detail(created.post.id).await.unwrap();
    assert_eq!(tag_names(&detail.post), vec!["c"]);
    assert_eq!(detail.post.post.title, "t2");
    // Tags are never deleted, only unlinked.
    assert_eq!(h.store.all().await.unwrap().len(), 3);
}

/// Tag store that cannot create the tag named `boom`.
struct FlakyTags {
    inner: Arc<InMemoryStore>,
}

#[async_trait::async_trait]
impl TagRepository for FlakyTags {
    async fn get_or_create(&self, tag_name: &str) -> Result<Tag, RepoError> {
        if tag_name == "boom" {
            return Err(RepoError::Connection("tag store unavailable".to_string()));
        }
        self.inner.get_or_create(tag_name).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        self.inner.find_by_slug(slug).await
    }

    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        TagRepository::all(self.inner.as_ref()).await
    }
}

#[tokio::test]
async fn failed_tag_resolution_leaves_post_untouched() {
    let h = harness(5);
    let (_, token) = h.sign_up("alice").await;
    let principal = h.principal(&token).await;
    let posts = PostService::new(
        h.store.clone(),
        Arc::new(FlakyTags {
            inner: h.store.clone(),
        }),
        h.store.clone(),
        5,
    );

    let created = posts
        .create(&principal, draft("orig", "c", Some("a; b")))
        .await
        .unwrap();

    let err = posts
        .update(&principal, created.post.id, draft("changed", "c2", Some("boom")))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Internal(_)));

    let detail = posts.detail(created.post.id).await.unwrap();
    assert_eq!(detail.post.post.title, "orig");
    assert_eq!(detail.post.post.content, "c");
    assert_eq!(tag_names(&detail.post), vec!["a", "b"]);

    let err = posts
        .create(&principal, draft("second", "c", Some("x, boom")))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Internal(_)));
    assert_eq!(posts.list(1).await.unwrap().total, 1);
}

#[tokio::test]
async fn only_author_may_update_or_delete_post() {
    let h = harness(5);
    let (alice, alice_token) = h.sign_up("alice").await;
    let (_, bob_token) = h.sign_up("bob").await;
    let alice_p = h.principal(&alice_token).await;
    let bob_p = h.principal(&bob_token).await;

    let view = h
        .posts
        .create(&alice_p, draft("mine", "c", Some("keep")))
        .await
        .unwrap();
    let id = view.post.id;

    for principal in [&bob_p, &Principal::Anonymous] {
        assert!(h
            .posts
            .update(principal, id, draft("stolen", "c", Some("evil")))
            .await
            .is_err());
        assert!(h.posts.delete(principal, id).await.is_err());
    }
    assert!(matches!(
        h.posts.update(&bob_p, id, draft("stolen", "", None)).await,
        Err(DomainError::PermissionDenied(_))
    ));

    let detail = h.posts.detail(id).await.unwrap();
    assert_eq!(detail.post.post.title, "mine");
    assert_eq!(detail.post.post.author_id(), alice.id);
    assert_eq!(tag_names(&detail.post), vec!["keep"]);
    let tags = h.store.all().await.unwrap();
    assert!(tags.iter().all(|t| t.tag_name != "evil"));

    h.posts.delete(&alice_p, id).await.unwrap();
    assert!(matches!(
        h.posts.detail(id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn search_matches_title_content_or_tag() {
    let h = harness(5);
    let (_, token) = h.sign_up("alice").await;
    let p = h.principal(&token).await;

    h.posts.create(&p, draft("new post", "", Some("misc"))).await.unwrap();
    h.posts.create(&p, draft("old", "something new", None)).await.unwrap();
    h.posts.create(&p, draft("x", "y", Some("newish"))).await.unwrap();
    h.posts.create(&p, draft("unrelated", "text", Some("misc"))).await.unwrap();

    let hits = h.posts.search("new").await.unwrap();
    let mut titles: Vec<&str> = hits.iter().map(|v| v.post.title.as_str()).collect();
    titles.sort_unstable();

    assert_eq!(titles, vec!["new post", "old", "x"]);
}

#[tokio::test]
async fn listing_paginates_newest_first() {
    let h = harness(2);
    let (_, token) = h.sign_up("alice").await;
    let p = h.principal(&token).await;
    for title in ["1", "2", "3"] {
        h.posts.create(&p, draft(title, "", None)).await.unwrap();
    }

    let first = h.posts.list(1).await.unwrap();
    let second = h.posts.list(2).await.unwrap();

    assert_eq!(first.total, 3);
    assert_eq!(first.total_pages, 2);
    let titles: Vec<&str> = first.items.iter().map(|v| v.post.title.as_str()).collect();
    assert_eq!(titles, vec!["3", "2"]);
    assert_eq!(second.items.len(), 1);
    assert!(matches!(h.posts.list(3).await, Err(DomainError::NotFound { .. })));
    assert!(matches!(h.posts.list(0).await, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn tag_listing_and_no_tag_sentinel() {
    let h = harness(5);
    let (_, token) = h.sign_up("alice").await;
    let p = h.principal(&token).await;

    h.posts.create(&p, draft("tagged", "", Some("Rust Lang"))).await.unwrap();
    h.posts.create(&p, draft("bare", "", None)).await.unwrap();

    let by_tag = h.posts.by_tag("rust-lang").await.unwrap();
    assert_eq!(by_tag.tag.unwrap().tag_name, "Rust Lang");
    assert_eq!(by_tag.posts.len(), 1);
    assert_eq!(by_tag.posts[0].post.title, "tagged");

    let untagged = h.posts.by_tag(NO_TAG_SLUG).await.unwrap();
    assert!(untagged.tag.is_none());
    assert_eq!(untagged.posts.len(), 1);
    assert_eq!(untagged.posts[0].post.title, "bare");

    assert!(matches!(
        h.posts.by_tag("missing").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn comments_are_owned_by_their_author() {
    let h = harness(5);
    let (alice, alice_token) = h.sign_up("alice").await;
    let (_, bob_token) = h.sign_up("bob").await;
    let alice_p = h.principal(&alice_token).await;
    let bob_p = h.principal(&bob_token).await;

    let post = h.posts.create(&bob_p, draft("bob's", "", None)).await.unwrap();
    let comment = h
        .comments
        .create(&alice_p, post.post.id, "nice".to_string())
        .await
        .unwrap();
    assert_eq!(comment.author_id(), alice.id);
    assert_eq!(comment.post_id(), post.post.id);

    assert!(matches!(
        h.comments.update(&bob_p, comment.id, "edited".to_string()).await,
        Err(DomainError::PermissionDenied(_))
    ));
    assert!(matches!(
        h.comments.delete(&bob_p, comment.id).await,
        Err(DomainError::PermissionDenied(_))
    ));

    let edited = h
        .comments
        .update(&alice_p, comment.id, "nicer".to_string())
        .await
        .unwrap();
    assert_eq!(edited.content, "nicer");
    assert_eq!(edited.author_id(), alice.id);

    let parent = h.comments.delete(&alice_p, comment.id).await.unwrap();
    assert_eq!(parent, post.post.id);
    assert!(h.posts.detail(post.post.id).await.unwrap().comments.is_empty());
}

#[tokio::test]
async fn comment_requires_login_and_existing_post() {
    let h = harness(5);
    let (_, token) = h.sign_up("alice").await;
    let p = h.principal(&token).await;

    assert!(matches!(
        h.comments
            .create(&Principal::Anonymous, Uuid::new_v4(), "hi".to_string())
            .await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        h.comments.create(&p, Uuid::new_v4(), "hi".to_string()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn deleting_own_account_ends_session() {
    let h = harness(5);
    let (alice, token) = h.sign_up("alice").await;
    let principal = h.principal(&token).await;
    h.posts.create(&principal, draft("doomed", "", None)).await.unwrap();

    h.accounts.delete_self(&principal).await.unwrap();

    let gone = BaseRepository::<User, Uuid>::find_by_id(h.store.as_ref(), alice.id)
        .await
        .unwrap();
    assert!(gone.is_none());
    let after = h.principal(&token).await;
    assert!(!after.is_authenticated());
    assert_eq!(h.posts.list(1).await.unwrap().total, 0);
}

#[tokio::test]
async fn anonymous_cannot_delete_an_account() {
    let h = harness(5);
    assert!(matches!(
        h.accounts.delete_self(&Principal::Anonymous).await,
        Err(DomainError::Unauthenticated)
    ));
}

#[tokio::test]
async fn logout_ends_only_that_session() {
    let h = harness(5);
    let (_, first) = h.sign_up("alice").await;
    let second = h.accounts.login("alice", "password123").await.unwrap().token;

    let p = h.principal(&first).await;
    h.accounts.logout(&p).await.unwrap();

    assert!(!h.principal(&first).await.is_authenticated());
    assert!(h.principal(&second).await.is_authenticated());
}

#[tokio::test]
async fn login_failures_are_validation_errors() {
    let h = harness(5);
    let (mut alice, _) = h.sign_up("alice").await;

    for (user, pass) in [("", "x"), ("alice", ""), ("alice", "wrong-password"), ("nobody", "password123")] {
        assert!(matches!(
            h.accounts.login(user, pass).await,
            Err(DomainError::Validation(_))
        ));
    }

    alice.is_active = false;
    BaseRepository::<User, Uuid>::save(h.store.as_ref(), alice)
        .await
        .unwrap();
    assert!(matches!(
        h.accounts.login("alice", "password123").await,
        Err(DomainError::Validation(msg)) if msg == "account is disabled"
    ));
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_input() {
    let h = harness(5);
    h.sign_up("alice").await;

    let dup = h
        .accounts
        .register(Registration {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await;
    assert!(matches!(dup, Err(DomainError::Duplicate(_))));

    let short = h
        .accounts
        .register(Registration {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "short".to_string(),
        })
        .await;
    assert!(matches!(short, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn garbage_token_resolves_to_anonymous() {
    let h = harness(5);
    assert_eq!(
        h.accounts.resolve(Some("not-a-jwt")).await.unwrap(),
        Principal::Anonymous
    );
    assert_eq!(h.accounts.resolve(None).await.unwrap(), Principal::Anonymous);
}
