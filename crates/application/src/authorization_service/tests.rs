use std::sync::Arc;

use forum_core::{AppError, UserIdentity};
use forum_domain::{AccountRole, Action, RoleTier};

use crate::AccountRepository;
use crate::test_support::{FakeAccountRepository, account, permission};

use super::AuthorizationService;

#[tokio::test]
async fn missing_identity_resolves_to_anonymous() {
    let service = AuthorizationService::new(Arc::new(FakeAccountRepository::default()));

    let actor = service.resolve_actor(None).await;
    assert!(actor.is_ok_and(|actor| actor.tier() == RoleTier::Anonymous));
}

#[tokio::test]
async fn resolve_actor_loads_role_and_grants() {
    let repository = FakeAccountRepository::default()
        .with_account(
            account("changer", AccountRole::Member),
            vec![permission("change_question")],
        )
        .await;
    let service = AuthorizationService::new(Arc::new(repository));

    let actor = service
        .resolve_actor(Some(&UserIdentity::new("changer")))
        .await;
    assert!(actor.is_ok());
    let actor = actor.unwrap_or_else(|_| unreachable!());
    assert_eq!(actor.tier(), RoleTier::Authenticated);
    assert!(actor.holds(Action::Change, "question"));
}

#[tokio::test]
async fn grants_are_read_fresh_on_every_resolution() {
    let changer = account("changer", AccountRole::Member);
    let changer_id = changer.id();
    let repository = Arc::new(
        FakeAccountRepository::default()
            .with_account(changer, Vec::new())
            .await,
    );
    let service = AuthorizationService::new(repository.clone());
    let identity = UserIdentity::new("changer");

    let before = service.resolve_actor(Some(&identity)).await;
    assert!(before.is_ok_and(|actor| !actor.holds(Action::Change, "question")));

    assert!(
        repository
            .grant_permission(changer_id, permission("change_question"))
            .await
            .is_ok()
    );

    let after = service.resolve_actor(Some(&identity)).await;
    assert!(after.is_ok_and(|actor| actor.holds(Action::Change, "question")));
}

#[tokio::test]
async fn unknown_or_inactive_subjects_are_rejected() {
    let repository = FakeAccountRepository::default()
        .with_account(
            account("dormant", AccountRole::Staff).with_active(false),
            Vec::new(),
        )
        .await;
    let service = AuthorizationService::new(Arc::new(repository));

    let unknown = service.resolve_actor(Some(&UserIdentity::new("ghost"))).await;
    assert!(matches!(unknown, Err(AppError::Unauthorized(_))));

    let dormant = service
        .resolve_actor(Some(&UserIdentity::new("dormant")))
        .await;
    assert!(matches!(dormant, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn permission_source_failure_is_propagated_not_granted() {
    let repository = FakeAccountRepository::failing_permission_lookup()
        .with_account(account("user_one", AccountRole::Member), Vec::new())
        .await;
    let service = AuthorizationService::new(Arc::new(repository));

    let actor = service
        .resolve_actor(Some(&UserIdentity::new("user_one")))
        .await;
    assert!(matches!(actor, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn require_superuser_distinguishes_anonymous_from_forbidden() {
    let repository = FakeAccountRepository::default()
        .with_account(account("staff", AccountRole::Staff), Vec::new())
        .await
        .with_account(account("root", AccountRole::Superuser), Vec::new())
        .await;
    let service = AuthorizationService::new(Arc::new(repository));

    assert!(matches!(
        service.require_superuser(None).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        service
            .require_superuser(Some(&UserIdentity::new("staff")))
            .await,
        Err(AppError::Forbidden(_))
    ));
    assert!(
        service
            .require_superuser(Some(&UserIdentity::new("root")))
            .await
            .is_ok_and(|actor| actor.is_superuser())
    );
}
