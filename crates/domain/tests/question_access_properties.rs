//! Property tests for the question access policy.

use forum_domain::{
    Action, Actor, FieldAccess, Permission, QUESTION_SCHEMA, Question, QuestionChanges,
    QuestionPolicy, QuestionRules, UserId,
};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Role {
    Anonymous,
    Member,
    Staff,
    Superuser,
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Anonymous),
        Just(Role::Member),
        Just(Role::Staff),
        Just(Role::Superuser),
    ]
}

fn grants_strategy() -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(
        prop_oneof![
            Just(Action::Add),
            Just(Action::View),
            Just(Action::Change),
            Just(Action::Delete),
        ],
        0..4,
    )
}

fn build_actor(role: Role, user_id: UserId, grants: &[Action]) -> Actor {
    let actor = match role {
        Role::Anonymous => Actor::anonymous(),
        Role::Member => Actor::member(user_id),
        Role::Staff => Actor::staff(user_id),
        Role::Superuser => Actor::superuser(user_id),
    };

    actor.with_grants(
        grants
            .iter()
            .filter_map(|action| Permission::new(*action, "question").ok()),
    )
}

fn build_question(creator: UserId, is_published: bool) -> Option<Question> {
    let mut question = Question::new("Lorem", "Foo bar", creator).ok()?;
    question
        .apply(QuestionChanges {
            is_published: Some(is_published),
            ..QuestionChanges::default()
        })
        .ok()?;
    Some(question)
}

proptest! {
    #[test]
    fn superuser_rows_are_a_superset_of_everyone_elses(
        role in role_strategy(),
        grants in grants_strategy(),
        is_published in any::<bool>(),
        actor_is_creator in any::<bool>(),
    ) {
        let policy = QuestionPolicy::new(QuestionRules);
        let user_id = UserId::new();
        let actor = build_actor(role, user_id, &grants);
        let superuser = Actor::superuser(UserId::new());
        let creator = if actor_is_creator { user_id } else { UserId::new() };
        let Some(question) = build_question(creator, is_published) else {
            return Err(TestCaseError::fail("question fixture must build"));
        };

        for action in [Action::View, Action::Change, Action::Delete] {
            let actor_permitted = policy.permits_row(&actor, action, &question);
            let superuser_permitted = policy.permits_row(&superuser, action, &question);
            prop_assert!(actor_permitted.is_ok());
            prop_assert!(superuser_permitted.is_ok());
            if actor_permitted.unwrap_or(false) {
                prop_assert!(superuser_permitted.unwrap_or(false));
            }
        }
    }

    #[test]
    fn field_sets_stay_within_schema_and_imply_row_visibility(
        role in role_strategy(),
        grants in grants_strategy(),
        is_published in any::<bool>(),
        actor_is_creator in any::<bool>(),
    ) {
        let policy = QuestionPolicy::new(QuestionRules);
        let user_id = UserId::new();
        let actor = build_actor(role, user_id, &grants);
        let creator = if actor_is_creator { user_id } else { UserId::new() };
        let Some(question) = build_question(creator, is_published) else {
            return Err(TestCaseError::fail("question fixture must build"));
        };
        let all_fields = QUESTION_SCHEMA.all_fields();

        let changeable = policy.changeable_fields(&actor, &question);
        let viewable = policy.viewable_fields(&actor, &question);
        let addable = policy.addable_fields(&actor);
        prop_assert!(changeable.is_ok());
        prop_assert!(viewable.is_ok());
        prop_assert!(addable.is_ok());
        let changeable = changeable.unwrap_or_else(|_| QUESTION_SCHEMA.no_fields());
        let viewable = viewable.unwrap_or_else(|_| QUESTION_SCHEMA.no_fields());
        let addable = addable.unwrap_or_else(|_| QUESTION_SCHEMA.no_fields());

        prop_assert!(changeable.is_subset(&all_fields));
        prop_assert!(viewable.is_subset(&all_fields));
        prop_assert!(addable.is_subset(&all_fields));

        if !viewable.is_empty() {
            prop_assert!(policy.permits_row(&actor, Action::View, &question).unwrap_or(false));
        }

        let access = policy.field_access(&actor, &question);
        prop_assert!(access.is_ok());
        for (field, access) in access.unwrap_or_default() {
            if access != FieldAccess::Hidden {
                prop_assert!(viewable.contains(field));
            }
        }
    }

    #[test]
    fn published_questions_are_visible_to_everyone(
        role in role_strategy(),
        grants in grants_strategy(),
    ) {
        let policy = QuestionPolicy::new(QuestionRules);
        let actor = build_actor(role, UserId::new(), &grants);
        let Some(question) = build_question(UserId::new(), true) else {
            return Err(TestCaseError::fail("question fixture must build"));
        };

        prop_assert!(policy.permits_row(&actor, Action::View, &question).unwrap_or(false));
    }

    #[test]
    fn unpublished_questions_are_visible_only_to_privileged_actors(
        role in role_strategy(),
        grants in grants_strategy(),
        actor_is_creator in any::<bool>(),
    ) {
        let policy = QuestionPolicy::new(QuestionRules);
        let user_id = UserId::new();
        let actor = build_actor(role, user_id, &grants);
        let creator = if actor_is_creator { user_id } else { UserId::new() };
        let Some(question) = build_question(creator, false) else {
            return Err(TestCaseError::fail("question fixture must build"));
        };

        let privileged = actor.is_staff()
            || actor.holds(Action::View, "question")
            || (actor.is_authenticated() && actor.is_user(creator));
        prop_assert_eq!(
            policy.permits_row(&actor, Action::View, &question).unwrap_or(false),
            privileged
        );
    }
}
