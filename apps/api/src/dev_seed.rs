use forum_core::AppResult;
use forum_domain::{AccountRole, Question, QuestionId, UserAccount};
use tracing::info;

use crate::api_services::Repositories;

const DEV_SEED_SUPERUSER: &str = "admin";
const DEV_SEED_STAFF: &str = "moderator";
const DEV_SEED_AUTHOR: &str = "user_1";
const DEV_SEED_DRAFTER: &str = "user_2";

/// Seeds demo accounts and questions once. Skipped when the superuser exists.
pub async fn run(repositories: &Repositories) -> AppResult<()> {
    if repositories
        .accounts
        .find_account_by_username(DEV_SEED_SUPERUSER)
        .await?
        .is_some()
    {
        info!("dev seed already applied");
        return Ok(());
    }

    let superuser = UserAccount::new(DEV_SEED_SUPERUSER, AccountRole::Superuser)?;
    let staff = UserAccount::new(DEV_SEED_STAFF, AccountRole::Staff)?;
    let author = UserAccount::new(DEV_SEED_AUTHOR, AccountRole::Member)?;
    let drafter = UserAccount::new(DEV_SEED_DRAFTER, AccountRole::Member)?;

    for account in [&superuser, &staff, &author, &drafter] {
        repositories.accounts.save_account(account.clone()).await?;
    }

    let published = Question::new(
        "How do I reset a forgotten password?",
        "The reset link in my inbox has expired.",
        author.id(),
    )?;
    let draft = Question::from_parts(
        QuestionId::new(),
        "Draft: moderation guidelines",
        "Collecting notes before publishing.",
        drafter.id(),
        false,
    )?;

    repositories.questions.insert_question(published).await?;
    repositories.questions.insert_question(draft).await?;

    info!(
        superuser = DEV_SEED_SUPERUSER,
        staff = DEV_SEED_STAFF,
        members = ?[DEV_SEED_AUTHOR, DEV_SEED_DRAFTER],
        "dev seed applied"
    );
    Ok(())
}
