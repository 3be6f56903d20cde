use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::{Author, AuthorChanges, AuthorDraft, Post, PostChanges, PostDraft};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{AuthorRepository, BaseRepository, PostRepository};
use quill_core::BlogService;
use quill_infra::{InMemoryAuthorRepository, InMemoryPostRepository};

struct Fixture {
    service: BlogService,
    authors: Arc<InMemoryAuthorRepository>,
    posts: Arc<InMemoryPostRepository>,
}

fn fixture() -> Fixture {
    let authors = Arc::new(InMemoryAuthorRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    Fixture {
        service: BlogService::new(authors.clone(), posts.clone()),
        authors,
        posts,
    }
}

fn author_draft(first: &str, last: &str, user: &str) -> AuthorDraft {
    AuthorDraft {
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        user_name: Some(user.into()),
    }
}

fn post_draft(author: &Author, title: &str) -> PostDraft {
    PostDraft {
        title: Some(title.into()),
        content: Some("C".into()),
        author: Some(author.id.to_string()),
        comments: Vec::new(),
    }
}

async fn ada(f: &Fixture) -> Author {
    f.service
        .create_author(author_draft("Ada", "Lovelace", "ada"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_created_post_reads_back_with_author_string() {
    let f = fixture();
    let ada = ada(&f).await;

    let created = f.service.create_post(post_draft(&ada, "T")).await.unwrap();
    assert_eq!(created.author_string.as_deref(), Some("Ada Lovelace"));

    let read = f.service.get_post(created.post.id).await.unwrap();
    assert_eq!(read.author_string.as_deref(), Some("Ada Lovelace"));
    assert_eq!(read.post.title, "T");
    assert_eq!(read.post.content, "C");
    assert_eq!(read.post.author_id, ada.id);
}

#[tokio::test]
async fn test_author_string_is_trimmed() {
    let f = fixture();
    let author = f
        .service
        .create_author(AuthorDraft {
            first_name: Some("Plato".into()),
            last_name: Some(" ".into()),
            user_name: Some("plato".into()),
        })
        .await;
    // Blank last names are rejected, so trimming only matters for stored data.
    assert!(matches!(author, Err(DomainError::MissingFields(_))));

    let stored = f
        .authors
        .insert(Author::new("Plato".into(), String::new(), "plato".into()))
        .await
        .unwrap();
    let view = f.service.create_post(post_draft(&stored, "Republic")).await.unwrap();
    assert_eq!(view.author_string.as_deref(), Some("Plato"));
}

#[tokio::test]
async fn test_post_with_unknown_author_is_rejected_and_not_persisted() {
    let f = fixture();
    let missing = Uuid::new_v4();

    let err = f
        .service
        .create_post(PostDraft {
            title: Some("T".into()),
            content: Some("C".into()),
            author: Some(missing.to_string()),
            comments: Vec::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::UnknownReference { id, .. } if id == missing));
    assert!(f.posts.find_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_missing_fields_never_reaches_store() {
    let f = fixture();
    let err = f.service.create_post(PostDraft::default()).await.unwrap_err();

    assert!(matches!(err, DomainError::MissingFields(ref fields) if fields.len() == 3));
    assert!(f.posts.find_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_user_name_conflicts_and_keeps_original() {
    let f = fixture();
    let original = ada(&f).await;

    let err = f
        .service
        .create_author(author_draft("Augusta", "King", "ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let authors = f.service.list_authors().await.unwrap();
    assert_eq!(authors, vec![original]);
}

#[tokio::test]
async fn test_user_name_whitespace_does_not_make_a_new_user() {
    let f = fixture();
    let original = ada(&f).await;

    let err = f
        .service
        .create_author(author_draft("Augusta", "King", " ada "))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
    assert_eq!(f.service.list_authors().await.unwrap(), vec![original]);

    let grace = f
        .service
        .create_author(author_draft("Grace", "Hopper", "\tgrace "))
        .await
        .unwrap();
    assert_eq!(grace.user_name, "grace");
    assert!(f.authors.find_by_user_name("grace").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_author_cascades_to_posts() {
    let f = fixture();
    let ada = ada(&f).await;
    let grace = f
        .service
        .create_author(author_draft("Grace", "Hopper", "grace"))
        .await
        .unwrap();

    f.service.create_post(post_draft(&ada, "A1")).await.unwrap();
    f.service.create_post(post_draft(&ada, "A2")).await.unwrap();
    let kept = f.service.create_post(post_draft(&grace, "G1")).await.unwrap();

    let deletion = f.service.delete_author(ada.id).await.unwrap();
    assert_eq!(deletion.posts_deleted, 2);
    assert_eq!(deletion.author.id, ada.id);

    let remaining = f.service.list_posts(None).await.unwrap();
    assert!(remaining.iter().all(|v| v.post.author_id != ada.id));
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].post.id, kept.post.id);

    assert!(matches!(
        f.service.get_author(ada.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_unknown_author_is_not_found() {
    let f = fixture();
    let err = f.service.delete_author(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Author", .. }));
}

/// Post store whose cascade step always fails.
struct BrokenCascade(InMemoryPostRepository);

#[async_trait]
impl BaseRepository<Post, Uuid> for BrokenCascade {
    async fn find_all(&self, limit: Option<u64>) -> Result<Vec<Post>, RepoError> {
        self.0.find_all(limit).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.0.insert(post).await
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        self.0.update(post).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl PostRepository for BrokenCascade {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.0.find_by_author(author_id).await
    }

    async fn delete_by_author(&self, _author_id: Uuid) -> Result<u64, RepoError> {
        Err(RepoError::Connection("store unavailable".into()))
    }
}

#[tokio::test]
async fn test_failed_cascade_keeps_author_and_posts() {
    let authors = Arc::new(InMemoryAuthorRepository::new());
    let posts = Arc::new(BrokenCascade(InMemoryPostRepository::new()));
    let service = BlogService::new(authors.clone(), posts.clone());

    let ada = service
        .create_author(author_draft("Ada", "Lovelace", "ada"))
        .await
        .unwrap();
    service.create_post(post_draft(&ada, "T")).await.unwrap();

    let err = service.delete_author(ada.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Store(RepoError::Connection(_))));

    // Neither step took effect: the author and its post are still resolvable.
    assert!(authors.find_by_id(ada.id).await.unwrap().is_some());
    let views = service.list_posts(None).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].author_string.as_deref(), Some("Ada Lovelace"));
}

/// Author store whose delete always fails.
struct BrokenAuthorDelete(InMemoryAuthorRepository);

#[async_trait]
impl BaseRepository<Author, Uuid> for BrokenAuthorDelete {
    async fn find_all(&self, limit: Option<u64>) -> Result<Vec<Author>, RepoError> {
        self.0.find_all(limit).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn insert(&self, author: Author) -> Result<Author, RepoError> {
        self.0.insert(author).await
    }

    async fn update(&self, author: Author) -> Result<Author, RepoError> {
        self.0.update(author).await
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(RepoError::Connection("store unavailable".into()))
    }
}

#[async_trait]
impl AuthorRepository for BrokenAuthorDelete {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<Author>, RepoError> {
        self.0.find_by_user_name(user_name).await
    }
}

#[tokio::test]
async fn test_failed_author_delete_after_cascade_keeps_author_without_posts() {
    let authors = Arc::new(BrokenAuthorDelete(InMemoryAuthorRepository::new()));
    let posts = Arc::new(InMemoryPostRepository::new());
    let service = BlogService::new(authors.clone(), posts.clone());

    let ada = service
        .create_author(author_draft("Ada", "Lovelace", "ada"))
        .await
        .unwrap();
    service.create_post(post_draft(&ada, "T1")).await.unwrap();
    service.create_post(post_draft(&ada, "T2")).await.unwrap();

    let err = service.delete_author(ada.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Store(RepoError::Connection(_))));

    // The posts went first; the author survives the failed second step.
    assert_eq!(service.get_author(ada.id).await.unwrap(), ada);
    assert!(posts.find_by_author(ada.id).await.unwrap().is_empty());
    assert!(service.list_posts(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_same_update_twice_is_idempotent() {
    let f = fixture();
    let ada = ada(&f).await;
    let post = f.service.create_post(post_draft(&ada, "T")).await.unwrap().post;

    let changes = PostChanges {
        title: Some("New".into()),
        content: Some("Body".into()),
    };
    let once = f
        .service
        .update_post(post.id, None, changes.clone())
        .await
        .unwrap();
    let twice = f
        .service
        .update_post(post.id, Some(&post.id.to_string()), changes)
        .await
        .unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.post.title, "New");
    assert_eq!(twice.post.created, post.created);
    assert_eq!(twice.post.author_id, ada.id);
}

#[tokio::test]
async fn test_update_with_mismatched_body_id_is_rejected() {
    let f = fixture();
    let ada = ada(&f).await;
    let post = f.service.create_post(post_draft(&ada, "T")).await.unwrap().post;

    let err = f
        .service
        .update_post(
            post.id,
            Some(&Uuid::new_v4().to_string()),
            PostChanges {
                title: Some("X".into()),
                content: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IdMismatch { .. }));

    let unchanged = f.service.get_post(post.id).await.unwrap();
    assert_eq!(unchanged.post.title, "T");
}

#[tokio::test]
async fn test_update_unknown_post_is_not_found() {
    let f = fixture();
    let err = f
        .service
        .update_post(
            Uuid::new_v4(),
            None,
            PostChanges {
                title: Some("X".into()),
                content: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn test_delete_post() {
    let f = fixture();
    let ada = ada(&f).await;
    let post = f.service.create_post(post_draft(&ada, "T")).await.unwrap().post;

    f.service.delete_post(post.id).await.unwrap();
    assert!(matches!(
        f.service.delete_post(post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_author_user_name_uniqueness() {
    let f = fixture();
    let ada = ada(&f).await;
    let grace = f
        .service
        .create_author(author_draft("Grace", "Hopper", "grace"))
        .await
        .unwrap();

    let err = f
        .service
        .update_author(
            grace.id,
            None,
            AuthorChanges {
                user_name: Some("ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    // Re-submitting an author's own user name is not a conflict.
    let updated = f
        .service
        .update_author(
            ada.id,
            Some(&ada.id.to_string()),
            AuthorChanges {
                first_name: Some("Augusta Ada".into()),
                user_name: Some("ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Augusta Ada");
    assert_eq!(updated.last_name, "Lovelace");
}

#[tokio::test]
async fn test_renamed_author_shows_in_existing_posts() {
    let f = fixture();
    let ada = ada(&f).await;
    let post = f.service.create_post(post_draft(&ada, "T")).await.unwrap().post;

    f.service
        .update_author(
            ada.id,
            None,
            AuthorChanges {
                last_name: Some("King".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let view = f.service.get_post(post.id).await.unwrap();
    assert_eq!(view.author_string.as_deref(), Some("Ada King"));
}

#[tokio::test]
async fn test_dangling_reference_degrades_instead_of_failing() {
    let f = fixture();
    let ada = ada(&f).await;
    f.service.create_post(post_draft(&ada, "fine")).await.unwrap();

    // Only reachable by writing to the store directly.
    let orphan = Post::new("orphan".into(), "C".into(), Uuid::new_v4(), Vec::new());
    f.posts.insert(orphan.clone()).await.unwrap();

    let view = f.service.get_post(orphan.id).await.unwrap();
    assert_eq!(view.author_string, None);

    let all = f.service.list_posts(None).await.unwrap();
    assert_eq!(all.len(), 2);
    let fine = all.iter().find(|v| v.post.title == "fine").unwrap();
    assert_eq!(fine.author_string.as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn test_list_posts_respects_limit() {
    let f = fixture();
    let ada = ada(&f).await;
    for i in 0..5 {
        f.service
            .create_post(post_draft(&ada, &format!("P{i}")))
            .await
            .unwrap();
    }

    assert_eq!(f.service.list_posts(None).await.unwrap().len(), 5);
    assert_eq!(f.service.list_posts(Some(2)).await.unwrap().len(), 2);
    assert_eq!(f.service.list_posts_by_author(ada.id).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_add_comment_appends_in_order() {
    let f = fixture();
    let ada = ada(&f).await;
    let post = f.service.create_post(post_draft(&ada, "T")).await.unwrap().post;

    f.service
        .add_comment(post.id, Some("first".into()))
        .await
        .unwrap();
    let view = f
        .service
        .add_comment(post.id, Some("second".into()))
        .await
        .unwrap();

    let contents: Vec<_> = view.post.comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
    assert_eq!(view.post.title, "T");

    assert!(matches!(
        f.service.add_comment(post.id, Some("  ".into())).await,
        Err(DomainError::MissingFields(_))
    ));
    assert!(matches!(
        f.service.add_comment(Uuid::new_v4(), Some("x".into())).await,
        Err(DomainError::NotFound { .. })
    ));
}
