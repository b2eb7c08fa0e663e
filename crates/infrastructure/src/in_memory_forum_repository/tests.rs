use forum_application::{AccountRepository, QuestionListQuery, QuestionRepository};
use forum_core::AppError;
use forum_domain::{
    AccountRole, FieldValue, Permission, QUESTION_SCHEMA, Question, QuestionChanges, QuestionId,
    RowFilter, UserAccount,
};

use super::InMemoryForumRepository;

fn account(username: &str) -> UserAccount {
    UserAccount::new(username, AccountRole::Member).unwrap_or_else(|_| unreachable!())
}

fn question(title: &str, creator: &UserAccount, is_published: bool) -> Question {
    Question::from_parts(QuestionId::new(), title, "Body", creator.id(), is_published)
        .unwrap_or_else(|_| unreachable!())
}

async fn seeded() -> (InMemoryForumRepository, UserAccount) {
    let repository = InMemoryForumRepository::new();
    let author = account("author");
    assert!(repository.save_account(author.clone()).await.is_ok());

    for (title, is_published) in [("first", true), ("second", false), ("third", true)] {
        assert!(
            repository
                .insert_question(question(title, &author, is_published))
                .await
                .is_ok()
        );
    }

    (repository, author)
}

#[tokio::test]
async fn listing_applies_filter_newest_first() {
    let (repository, _) = seeded().await;
    let published = RowFilter::field_equals(
        &QUESTION_SCHEMA,
        Question::IS_PUBLISHED,
        FieldValue::Bool(true),
    )
    .unwrap_or_else(|_| unreachable!());

    let titles: Vec<String> = repository
        .list_questions(&published, QuestionListQuery::default())
        .await
        .map(|questions| {
            questions
                .iter()
                .map(|question| question.title().to_owned())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(titles, vec!["third", "first"]);

    let page = repository
        .list_questions(
            &RowFilter::Everything,
            QuestionListQuery {
                limit: 1,
                offset: 1,
            },
        )
        .await;
    assert!(page.is_ok_and(|questions| questions.len() == 1 && questions[0].title() == "second"));

    let nothing = repository
        .list_questions(&RowFilter::Nothing, QuestionListQuery::default())
        .await;
    assert!(nothing.is_ok_and(|questions| questions.is_empty()));
}

#[tokio::test]
async fn usernames_are_unique() {
    let (repository, _) = seeded().await;

    assert!(matches!(
        repository.save_account(account("author")).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn grants_are_idempotent() {
    let (repository, author) = seeded().await;
    let permission: Permission = "view_question".parse().unwrap_or_else(|_| unreachable!());

    for _ in 0..2 {
        assert!(
            repository
                .grant_permission(author.id(), permission.clone())
                .await
                .is_ok()
        );
    }
    assert!(
        repository
            .list_permissions_for_account(author.id())
            .await
            .is_ok_and(|grants| grants == vec![permission.clone()])
    );

    for _ in 0..2 {
        assert!(
            repository
                .revoke_permission(author.id(), permission.clone())
                .await
                .is_ok()
        );
    }
    assert!(
        repository
            .list_permissions_for_account(author.id())
            .await
            .is_ok_and(|grants| grants.is_empty())
    );
}

#[tokio::test]
async fn creators_cannot_be_deleted_while_referenced() {
    let (repository, author) = seeded().await;

    assert!(matches!(
        repository.delete_account(author.id()).await,
        Err(AppError::Conflict(_))
    ));

    let questions = repository
        .list_questions(&RowFilter::Everything, QuestionListQuery::default())
        .await
        .unwrap_or_default();
    for question in questions {
        assert!(repository.delete_question(question.id()).await.is_ok());
    }

    assert!(repository.delete_account(author.id()).await.is_ok());
    assert!(
        repository
            .find_account(author.id())
            .await
            .is_ok_and(|account| account.is_none())
    );
}

#[tokio::test]
async fn questions_require_an_existing_creator() {
    let repository = InMemoryForumRepository::new();
    let stranger = account("stranger");

    assert!(matches!(
        repository
            .insert_question(question("orphan", &stranger, true))
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn updates_keep_untouched_fields_from_other_writers() {
    let (repository, author) = seeded().await;
    let stored = question("draft", &author, true);
    assert!(repository.insert_question(stored.clone()).await.is_ok());

    let unpublish = QuestionChanges {
        is_published: Some(false),
        ..QuestionChanges::default()
    };
    let edit = QuestionChanges {
        body: Some("Edited".to_owned()),
        ..QuestionChanges::default()
    };
    assert!(repository.update_question(stored.id(), unpublish).await.is_ok());
    let edited = repository.update_question(stored.id(), edit).await;

    assert!(edited.is_ok_and(|question| question.body() == "Edited" && !question.is_published()));
    assert!(
        repository
            .find_question(stored.id())
            .await
            .is_ok_and(|found| found.is_some_and(|found| found.title() == "draft"))
    );
}

#[tokio::test]
async fn updates_reject_unknown_rows_and_creators() {
    let (repository, author) = seeded().await;
    let stored = question("draft", &author, false);
    assert!(repository.insert_question(stored.clone()).await.is_ok());

    assert!(matches!(
        repository
            .update_question(QuestionId::new(), QuestionChanges::default())
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        repository
            .update_question(
                stored.id(),
                QuestionChanges {
                    creator: Some(account("stranger").id()),
                    ..QuestionChanges::default()
                },
            )
            .await,
        Err(AppError::Validation(_))
    ));
    assert!(
        repository
            .find_question(stored.id())
            .await
            .is_ok_and(|found| found.is_some_and(|found| found.creator() == author.id()))
    );
}
