//! Repository-level integration tests against a real Postgres schema.

use assert_matches::assert_matches;
use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;
use yamdb_db::models::comment::CreateComment;
use yamdb_db::models::review::{CreateReview, UpdateReview};
use yamdb_db::models::taxon::{CreateTaxon, TaxonKind};
use yamdb_db::models::title::{CreateTitle, TitleFilter, TitleOrdering, UpdateTitle};
use yamdb_db::models::user::{CreateUser, UpdateUser, User};
use yamdb_db::repositories::{CommentRepo, ReviewRepo, TaxonRepo, TitleRepo, UserRepo};

async fn user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(pool, &CreateUser::signup(username, format!("{username}@test.com")))
        .await
        .unwrap()
}

async fn taxon(pool: &PgPool, kind: TaxonKind, name: &str, slug: &str) -> DbId {
    let input = CreateTaxon {
        name: name.into(),
        slug: slug.into(),
    };
    TaxonRepo::create(pool, kind, &input).await.unwrap().id
}

async fn title(pool: &PgPool, name: &str, year: i32, category_id: DbId, genre_ids: Vec<DbId>) -> DbId {
    let input = CreateTitle {
        name: name.into(),
        year,
        description: None,
        category_id,
        genre_ids,
    };
    TitleRepo::create(pool, &input).await.unwrap().id
}

async fn review(pool: &PgPool, title_id: DbId, author_id: DbId, score: i16) -> Result<DbId, sqlx::Error> {
    let input = CreateReview {
        title_id,
        author_id,
        text: "Some thoughts".into(),
        score,
    };
    ReviewRepo::create(pool, &input).await.map(|r| r.id)
}

fn constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_defaults_and_uniqueness(pool: PgPool) {
    let created = user(&pool, "reader").await;
    assert_eq!(created.role, "user");
    assert_eq!(created.role().unwrap(), Role::User);
    assert!(!created.is_staff);
    assert!(created.confirmation_code_hash.is_none());

    let err = UserRepo::create(&pool, &CreateUser::signup("reader", "other@test.com"))
        .await
        .unwrap_err();
    assert_eq!(constraint(&err).as_deref(), Some("uq_users_username"));

    let err = UserRepo::create(&pool, &CreateUser::signup("other", "reader@test.com"))
        .await
        .unwrap_err();
    assert_eq!(constraint(&err).as_deref(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reserved_username_rejected_by_schema(pool: PgPool) {
    let err = UserRepo::create(&pool, &CreateUser::signup("me", "me@test.com"))
        .await
        .unwrap_err();
    assert_eq!(constraint(&err).as_deref(), Some("ck_users_username_not_me"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_update_and_code_storage(pool: PgPool) {
    let created = user(&pool, "reader").await;

    let update = UpdateUser {
        bio: Some("Watches everything".into()),
        role: Some(Role::Moderator),
        ..Default::default()
    };
    let updated = UserRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.bio, "Watches everything");
    assert_eq!(updated.role, "moderator");
    assert_eq!(updated.username, "reader");

    UserRepo::set_confirmation_code(&pool, created.id, "abc123hash")
        .await
        .unwrap();
    let reloaded = UserRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.confirmation_code_hash.as_deref(), Some("abc123hash"));
    assert!(reloaded.confirmation_code_issued_at.is_some());

    assert_matches!(UserRepo::update(&pool, 999_999, &update).await, Ok(None));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grant_superuser(pool: PgPool) {
    let created = user(&pool, "root").await;

    let admin = UserRepo::grant_superuser(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.role, "admin");
    assert!(admin.is_staff);
    assert!(admin.is_superuser);
    assert!(admin.actor().unwrap().is_admin());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_search_escapes_wildcards(pool: PgPool) {
    user(&pool, "plain").await;
    user(&pool, "under_score").await;

    assert_eq!(UserRepo::count(&pool, Some("_")).await.unwrap(), 1);
    assert_eq!(UserRepo::count(&pool, Some("%")).await.unwrap(), 0);
    assert_eq!(UserRepo::count(&pool, None).await.unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_in_use_cannot_be_deleted(pool: PgPool) {
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    title(&pool, "Alien", 1979, films, vec![]).await;

    let err = TaxonRepo::delete_by_slug(&pool, TaxonKind::Category, "films")
        .await
        .unwrap_err();
    assert_matches!(&err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"));

    assert!(!TaxonRepo::delete_by_slug(&pool, TaxonKind::Category, "missing")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_slugs_skips_unknown(pool: PgPool) {
    taxon(&pool, TaxonKind::Genre, "Drama", "drama").await;
    taxon(&pool, TaxonKind::Genre, "Horror", "horror").await;

    let found = TaxonRepo::find_by_slugs(
        &pool,
        TaxonKind::Genre,
        &["horror".to_string(), "western".to_string()],
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].slug, "horror");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_filter_by_genre_and_ordering(pool: PgPool) {
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    let horror = taxon(&pool, TaxonKind::Genre, "Horror", "horror").await;
    let drama = taxon(&pool, TaxonKind::Genre, "Drama", "drama").await;
    title(&pool, "Alien", 1979, films, vec![horror]).await;
    title(&pool, "Heat", 1995, films, vec![drama]).await;
    title(&pool, "Jaws", 1975, films, vec![horror, drama]).await;

    let filter = TitleFilter {
        genre: Some("horror".into()),
        ordering: TitleOrdering::YearDesc,
        ..Default::default()
    };
    let titles = TitleRepo::list(&pool, &filter, 10, 0).await.unwrap();
    let names: Vec<&str> = titles.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Alien", "Jaws"]);
    assert_eq!(TitleRepo::count(&pool, &filter).await.unwrap(), 2);

    let page = TitleRepo::list(&pool, &TitleFilter::default(), 2, 1).await.unwrap();
    let names: Vec<&str> = page.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Heat", "Jaws"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_ordering_by_category_name(pool: PgPool) {
    let series = taxon(&pool, TaxonKind::Category, "Series", "series").await;
    let books = taxon(&pool, TaxonKind::Category, "Books", "books").await;
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    title(&pool, "Fargo", 2014, series, vec![]).await;
    title(&pool, "Dune", 1965, books, vec![]).await;
    title(&pool, "Heat", 1995, films, vec![]).await;

    let filter = TitleFilter {
        ordering: TitleOrdering::CategoryDesc,
        ..Default::default()
    };
    let titles = TitleRepo::list(&pool, &filter, 10, 0).await.unwrap();
    let categories: Vec<&str> = titles.iter().map(|t| t.category_slug.as_str()).collect();
    assert_eq!(categories, vec!["series", "films", "books"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_update_replaces_genres(pool: PgPool) {
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    let horror = taxon(&pool, TaxonKind::Genre, "Horror", "horror").await;
    let drama = taxon(&pool, TaxonKind::Genre, "Drama", "drama").await;
    let id = title(&pool, "Alien", 1979, films, vec![horror]).await;

    let update = UpdateTitle {
        year: Some(1980),
        genre_ids: Some(vec![drama]),
        ..Default::default()
    };
    let updated = TitleRepo::update(&pool, id, &update).await.unwrap().unwrap();
    assert_eq!(updated.year, 1980);
    assert_eq!(updated.category_slug, "films");

    let genres = TitleRepo::genres_for_titles(&pool, &[id]).await.unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].genre.slug, "drama");

    let untouched = UpdateTitle {
        name: Some("Alien (1979)".into()),
        ..Default::default()
    };
    TitleRepo::update(&pool, id, &untouched).await.unwrap();
    assert_eq!(TitleRepo::genres_for_titles(&pool, &[id]).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Reviews and comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_review_per_author_and_score_bounds(pool: PgPool) {
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    let id = title(&pool, "Alien", 1979, films, vec![]).await;
    let author = user(&pool, "reader").await;

    review(&pool, id, author.id, 8).await.unwrap();
    assert!(ReviewRepo::exists_for_author(&pool, id, author.id).await.unwrap());

    let err = review(&pool, id, author.id, 7).await.unwrap_err();
    assert_eq!(constraint(&err).as_deref(), Some("uq_reviews_title_author"));

    let other = user(&pool, "other").await;
    let err = review(&pool, id, other.id, 11).await.unwrap_err();
    assert_eq!(constraint(&err).as_deref(), Some("ck_reviews_score"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_update_keeps_author(pool: PgPool) {
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    let id = title(&pool, "Alien", 1979, films, vec![]).await;
    let author = user(&pool, "reader").await;
    let review_id = review(&pool, id, author.id, 8).await.unwrap();

    let update = UpdateReview {
        score: Some(3),
        ..Default::default()
    };
    let updated = ReviewRepo::update(&pool, review_id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.score, 3);
    assert_eq!(updated.body.author, "reader");
    assert_eq!(updated.body.text, "Some thoughts");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deletes_cascade(pool: PgPool) {
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    let alien = title(&pool, "Alien", 1979, films, vec![]).await;
    let heat = title(&pool, "Heat", 1995, films, vec![]).await;
    let author = user(&pool, "reader").await;
    let commenter = user(&pool, "talker").await;

    let alien_review = review(&pool, alien, author.id, 8).await.unwrap();
    let heat_review = review(&pool, heat, author.id, 6).await.unwrap();
    let comment = CreateComment {
        review_id: heat_review,
        author_id: commenter.id,
        text: "Agreed".into(),
    };
    CommentRepo::create(&pool, &comment).await.unwrap();
    assert_eq!(CommentRepo::count_for_review(&pool, heat_review).await.unwrap(), 1);

    // Title deletion removes its reviews.
    assert!(TitleRepo::delete(&pool, alien).await.unwrap());
    assert!(ReviewRepo::find_for_title(&pool, alien, alien_review)
        .await
        .unwrap()
        .is_none());

    // Commenter deletion removes their comments.
    assert!(UserRepo::delete_by_username(&pool, "talker").await.unwrap());
    assert_eq!(CommentRepo::count_for_review(&pool, heat_review).await.unwrap(), 0);

    // Author deletion removes their remaining reviews.
    assert!(UserRepo::delete_by_username(&pool, "reader").await.unwrap());
    assert_eq!(ReviewRepo::count_for_title(&pool, heat).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scores_for_titles(pool: PgPool) {
    let films = taxon(&pool, TaxonKind::Category, "Films", "films").await;
    let alien = title(&pool, "Alien", 1979, films, vec![]).await;
    let heat = title(&pool, "Heat", 1995, films, vec![]).await;
    let a = user(&pool, "a").await;
    let b = user(&pool, "b").await;
    review(&pool, alien, a.id, 6).await.unwrap();
    review(&pool, alien, b.id, 9).await.unwrap();

    let mut scores = ReviewRepo::scores_for_titles(&pool, &[alien, heat]).await.unwrap();
    scores.sort();
    assert_eq!(scores, vec![(alien, 6), (alien, 9)]);
}
