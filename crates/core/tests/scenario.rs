//! End-to-end service flow against a scripted mock database.
//!
//! Query results are consumed in call order, so each step below queues
//! exactly what the services will read.

#![allow(clippy::unwrap_used)]

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use maplit::btreemap;
use repost_common::{AppError, TokenIssuer, config::AuthConfig};
use repost_core::{
    CreatePostInput, CreateResubInput, CreateUserInput, PostService, ResubService, Resolver,
    UserService, Vote,
};
use repost_db::{
    entities::{post, resub, user},
    repositories::{
        CommentRepository, PostRepository, PostVoteRepository, ResubRepository, UserRepository,
    },
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};

fn user_row(id: i32, username: &str) -> user::Model {
    user::Model {
        id,
        username: username.to_string(),
        hashed_password: String::new(),
        bio: String::new(),
        avatar_url: None,
        created: Utc::now().into(),
    }
}

fn total(post_id: i32, votes: i64) -> BTreeMap<&'static str, Value> {
    btreemap! {
        "subject_id" => Value::Int(Some(post_id)),
        "votes" => Value::BigInt(Some(votes)),
    }
}

fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

struct App {
    users: UserService,
    resubs: ResubService,
    posts: PostService,
    resolver: Resolver,
}

fn app(db: DatabaseConnection) -> App {
    let db = Arc::new(db);
    let user_repo = UserRepository::new(db.clone());
    let resub_repo = ResubRepository::new(db.clone());
    let post_repo = PostRepository::new(db.clone());
    let tokens = TokenIssuer::new(&AuthConfig {
        jwt_secret: "scenario".to_string(),
        ..AuthConfig::default()
    })
    .unwrap();

    App {
        users: UserService::new(user_repo.clone()),
        resubs: ResubService::new(resub_repo.clone(), user_repo.clone()),
        posts: PostService::new(
            post_repo.clone(),
            PostVoteRepository::new(db.clone()),
            user_repo.clone(),
            resub_repo.clone(),
        ),
        resolver: Resolver::new(
            user_repo,
            resub_repo,
            post_repo,
            CommentRepository::new(db),
            tokens,
        ),
    }
}

#[tokio::test]
async fn test_vote_then_delete_scenario() {
    let alice_row = user_row(1, "alice");
    let bob_row = user_row(2, "bob");
    let cats_row = resub::Model {
        id: 1,
        name: "cats".to_string(),
        description: None,
        owner_id: 1,
        created: Utc::now().into(),
        edited: None,
    };
    let hi_row = post::Model {
        id: 1,
        title: "hi".to_string(),
        url: None,
        content: None,
        author_id: 1,
        parent_resub_id: 1,
        created: Utc::now().into(),
        edited: None,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // alice and bob register
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([[alice_row.clone()]])
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([[bob_row.clone()]])
        // alice creates "cats" and posts "hi"
        .append_query_results([Vec::<resub::Model>::new()])
        .append_query_results([[cats_row.clone()]])
        .append_query_results([[hi_row.clone()]])
        // alice upvotes: total 1
        .append_query_results([[total(1, 1)]])
        .append_query_results([[alice_row.clone()]])
        .append_query_results([[cats_row.clone()]])
        // bob downvotes: total 0
        .append_query_results([[total(1, 0)]])
        .append_query_results([[alice_row.clone()]])
        .append_query_results([[cats_row]])
        // lookup after delete
        .append_query_results([Vec::<post::Model>::new()])
        .append_exec_results([exec_ok(), exec_ok(), exec_ok()])
        .into_connection();
    let app = app(db);

    let alice = app
        .users
        .create(CreateUserInput {
            username: "alice".to_string(),
            password: "password1".to_string(),
        })
        .await
        .unwrap();
    let bob = app
        .users
        .create(CreateUserInput {
            username: "bob".to_string(),
            password: "password2".to_string(),
        })
        .await
        .unwrap();

    let cats = app
        .resubs
        .create(
            &alice,
            CreateResubInput {
                name: "cats".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cats.owner_username, "alice");

    let hi = app
        .posts
        .create(
            &alice,
            &cats.resub,
            CreatePostInput {
                title: "hi".to_string(),
                url: None,
                content: None,
            },
        )
        .await
        .unwrap();

    let voted = app
        .posts
        .vote(hi.post.clone(), &alice, Vote::Up)
        .await
        .unwrap();
    assert_eq!(voted.votes, 1);

    let voted = app
        .posts
        .vote(hi.post.clone(), &bob, Vote::Down)
        .await
        .unwrap();
    assert_eq!(voted.votes, 0);

    let owned = app
        .resolver
        .resolve_post_owner_or_resub_owner(hi.post, &alice)
        .await
        .unwrap();
    let post_id = owned.id;
    app.posts.delete(owned).await.unwrap();

    let result = app.resolver.resolve_post(post_id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
