//! Integration tests for advisor-relationship resolution (PRD-07).
//!
//! Exercises the code-based linking joins against a real database: a
//! relationship only resolves when the party's entered code matches the
//! advisor's code AND the advisor accepted the party.

use dealflow_db::models::party::{CreateAdvisor, CreateInvestor, CreateStartup};
use dealflow_db::repositories::{AdvisorRepo, InvestorRepo, StartupRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_advisor(code: &str) -> CreateAdvisor {
    CreateAdvisor {
        name: format!("Advisor {code}"),
        code: code.to_string(),
        email: format!("{}@advisors.test", code.to_lowercase()),
    }
}

fn new_investor(name: &str, code: Option<&str>, accepted: bool) -> CreateInvestor {
    CreateInvestor {
        name: name.to_string(),
        contact_email: format!("{}@investors.test", name.to_lowercase()),
        contact_phone: Some("+1 555 0100".to_string()),
        advisor_code_entered: code.map(str::to_string),
        advisor_accepted: Some(accepted),
    }
}

fn new_startup(name: &str, code: Option<&str>, accepted: bool) -> CreateStartup {
    CreateStartup {
        name: name.to_string(),
        contact_email: format!("{}@startups.test", name.to_lowercase()),
        contact_phone: None,
        advisor_code_entered: code.map(str::to_string),
        advisor_accepted: Some(accepted),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_effective_relationship_resolves(pool: PgPool) {
    let advisor = AdvisorRepo::create(&pool, &new_advisor("ADV-001")).await.unwrap();
    let investor = InvestorRepo::create(&pool, &new_investor("acme", Some("ADV-001"), true))
        .await
        .unwrap();

    let resolved = AdvisorRepo::resolve_for_investor(&pool, investor.id)
        .await
        .unwrap();
    assert_eq!(resolved.map(|a| a.id), Some(advisor.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_entered_but_not_accepted_does_not_resolve(pool: PgPool) {
    AdvisorRepo::create(&pool, &new_advisor("ADV-001")).await.unwrap();
    let investor = InvestorRepo::create(&pool, &new_investor("acme", Some("ADV-001"), false))
        .await
        .unwrap();

    let resolved = AdvisorRepo::resolve_for_investor(&pool, investor.id)
        .await
        .unwrap();
    assert!(resolved.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_wrong_code_does_not_resolve(pool: PgPool) {
    AdvisorRepo::create(&pool, &new_advisor("ADV-001")).await.unwrap();
    let investor = InvestorRepo::create(&pool, &new_investor("acme", Some("ADV-999"), true))
        .await
        .unwrap();

    let resolved = AdvisorRepo::resolve_for_investor(&pool, investor.id)
        .await
        .unwrap();
    assert!(resolved.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_no_code_entered_does_not_resolve(pool: PgPool) {
    AdvisorRepo::create(&pool, &new_advisor("ADV-001")).await.unwrap();
    let startup = StartupRepo::create(&pool, &new_startup("nimbus", None, true))
        .await
        .unwrap();

    let resolved = AdvisorRepo::resolve_for_startup(&pool, startup.id)
        .await
        .unwrap();
    assert!(resolved.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_startup_relationship_resolves_independently(pool: PgPool) {
    let advisor = AdvisorRepo::create(&pool, &new_advisor("ADV-002")).await.unwrap();
    let startup = StartupRepo::create(&pool, &new_startup("nimbus", Some("ADV-002"), true))
        .await
        .unwrap();
    // An investor pointing at the same advisor without acceptance stays
    // unresolved.
    let investor = InvestorRepo::create(&pool, &new_investor("acme", Some("ADV-002"), false))
        .await
        .unwrap();

    let for_startup = AdvisorRepo::resolve_for_startup(&pool, startup.id)
        .await
        .unwrap();
    assert_eq!(for_startup.map(|a| a.id), Some(advisor.id));

    let for_investor = AdvisorRepo::resolve_for_investor(&pool, investor.id)
        .await
        .unwrap();
    assert!(for_investor.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_by_code(pool: PgPool) {
    let advisor = AdvisorRepo::create(&pool, &new_advisor("ADV-007")).await.unwrap();

    let found = AdvisorRepo::find_by_code(&pool, "ADV-007").await.unwrap();
    assert_eq!(found.map(|a| a.id), Some(advisor.id));

    let missing = AdvisorRepo::find_by_code(&pool, "ADV-404").await.unwrap();
    assert!(missing.is_none());
}
