//! Repository integration tests for clients, lawyers, cases, hearings and
//! documents: CRUD, soft delete, list filtering and pagination.

use adala_core::pagination::{Page, SortDirection};
use adala_db::models::client::{ClientQuery, CreateClient, UpdateClient};
use adala_db::models::document::{CreateDocument, DocumentQuery};
use adala_db::models::hearing::{CompleteHearing, CreateHearing, FollowUpHearing, HearingQuery};
use adala_db::models::lawyer::CreateLawyer;
use adala_db::models::legal_case::{CaseQuery, CreateCase, UpdateCase};
use adala_db::repositories::{CaseRepo, ClientRepo, DocumentRepo, HearingRepo, LawyerRepo};
use adala_db::RepoError;
use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_client(name: &str) -> CreateClient {
    CreateClient {
        client_type: None,
        name: name.to_string(),
        name_ar: None,
        email: None,
        phone: None,
        national_id: None,
        commercial_register: None,
        address: None,
        notes: None,
    }
}

fn new_lawyer(name: &str, license: &str) -> CreateLawyer {
    CreateLawyer {
        user_id: None,
        full_name: name.to_string(),
        full_name_ar: None,
        email: None,
        phone: None,
        license_number: license.to_string(),
        specialization: None,
        hourly_rate_minor: None,
    }
}

fn new_case(client_id: i64, lead: Option<i64>, title: &str) -> CreateCase {
    CreateCase {
        case_number: None,
        title: title.to_string(),
        title_ar: None,
        description: None,
        client_id,
        lead_lawyer_id: lead,
        case_type: "civil".to_string(),
        priority: None,
        court_name: None,
        court_reference: None,
        opponent_name: None,
        opened_on: None,
    }
}

fn new_hearing(case_id: i64, in_days: i64) -> CreateHearing {
    CreateHearing {
        case_id,
        lawyer_id: None,
        hearing_type: None,
        scheduled_at: Utc::now() + Duration::days(in_days),
        court_name: Some("Riyadh General Court".to_string()),
        courtroom: None,
        judge_name: None,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_client_crud_and_soft_delete(pool: PgPool) {
    let mut input = new_client("  Al Noor Trading  ");
    input.name_ar = Some("النور للتجارة".to_string());
    let client = ClientRepo::create(&pool, &input, None).await.unwrap();
    assert_eq!(client.name, "Al Noor Trading");
    assert_eq!(client.client_type, "individual");
    assert!(client.is_active);

    let update = UpdateClient {
        client_type: Some("company".to_string()),
        name: None,
        name_ar: None,
        email: Some("info@alnoor.example".to_string()),
        phone: None,
        national_id: None,
        commercial_register: None,
        address: None,
        notes: None,
        is_active: None,
    };
    let updated = ClientRepo::update(&pool, client.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.client_type, "company");
    assert_eq!(updated.name_ar.as_deref(), Some("النور للتجارة"));
    assert!(updated.updated_at >= client.updated_at);

    assert!(ClientRepo::soft_delete(&pool, client.id).await.unwrap());
    assert!(!ClientRepo::soft_delete(&pool, client.id).await.unwrap());
    assert!(ClientRepo::find_by_id(&pool, client.id).await.unwrap().is_none());
    assert!(!ClientRepo::exists(&pool, client.id).await.unwrap());
    assert!(ClientRepo::update(&pool, client.id, &update).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_client_national_id_unique_among_live_rows(pool: PgPool) {
    let mut input = new_client("First");
    input.national_id = Some("1012345678".to_string());
    let first = ClientRepo::create(&pool, &input, None).await.unwrap();

    let err = ClientRepo::create(&pool, &input, None).await.unwrap_err();
    assert_matches!(&err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"));

    // Freed once the holder is deleted.
    ClientRepo::soft_delete(&pool, first.id).await.unwrap();
    ClientRepo::create(&pool, &input, None).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_client_list_search_filter_and_pages(pool: PgPool) {
    for name in ["Alpha Co", "Beta Co", "Gamma LLC", "Delta Co"] {
        let mut input = new_client(name);
        if name.ends_with("Co") {
            input.client_type = Some("company".to_string());
        }
        ClientRepo::create(&pool, &input, None).await.unwrap();
    }
    let mut arabic = new_client("Hassan");
    arabic.name_ar = Some("حسن_50%".to_string());
    ClientRepo::create(&pool, &arabic, None).await.unwrap();

    let params = ClientQuery {
        client_type: Some("company".to_string()),
        sort_by: Some("name".to_string()),
        sort_dir: Some(SortDirection::Asc),
        ..Default::default()
    };
    let total = ClientRepo::count(&pool, &params).await.unwrap();
    assert_eq!(total, 3);
    let first_page = ClientRepo::list(&pool, &params, Page::from_params(Some(1), Some(2)))
        .await
        .unwrap();
    let names: Vec<_> = first_page.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha Co", "Beta Co"]);
    let second_page = ClientRepo::list(&pool, &params, Page::from_params(Some(2), Some(2)))
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].name, "Delta Co");

    // Search is case-insensitive and treats wildcards literally.
    let params = ClientQuery {
        search: Some("gamma".to_string()),
        ..Default::default()
    };
    assert_eq!(ClientRepo::count(&pool, &params).await.unwrap(), 1);
    let params = ClientQuery {
        search: Some("_50%".to_string()),
        ..Default::default()
    };
    let found = ClientRepo::list(&pool, &params, Page::default()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Hassan");
    let params = ClientQuery {
        search: Some("%".to_string()),
        ..Default::default()
    };
    assert_eq!(ClientRepo::count(&pool, &params).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_case_numbers_and_lead_team_membership(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Client"), None).await.unwrap();
    let lead = LawyerRepo::create(&pool, &new_lawyer("Sara", "L-1")).await.unwrap();

    let first = CaseRepo::next_case_number(&pool, 2026).await.unwrap();
    let second = CaseRepo::next_case_number(&pool, 2026).await.unwrap();
    assert_eq!(first, "CASE-2026-00001");
    assert_eq!(second, "CASE-2026-00002");

    let case = CaseRepo::create(&pool, &first, &new_case(client.id, Some(lead.id), "Lease"), None)
        .await
        .unwrap();
    assert_eq!(case.status, "open");
    assert_eq!(case.priority, "medium");

    let team = CaseRepo::list_team(&pool, case.id).await.unwrap();
    assert_eq!(team.len(), 1);
    assert_eq!(team[0].lawyer_id, lead.id);
    assert_eq!(team[0].role, "lead");

    let detail = CaseRepo::find_detail(&pool, case.id).await.unwrap().unwrap();
    assert_eq!(detail.client_name, "Client");
    assert_eq!(detail.lead_lawyer_name.as_deref(), Some("Sara"));

    // Duplicate references are rejected by the unique constraint.
    let err = CaseRepo::create(&pool, &first, &new_case(client.id, None, "Dup"), None)
        .await
        .unwrap_err();
    assert_matches!(&err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_case_team_lead_changes(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Client"), None).await.unwrap();
    let a = LawyerRepo::create(&pool, &new_lawyer("A", "L-A")).await.unwrap();
    let b = LawyerRepo::create(&pool, &new_lawyer("B", "L-B")).await.unwrap();
    let case = CaseRepo::create(&pool, "C-1", &new_case(client.id, Some(a.id), "Team"), None)
        .await
        .unwrap();

    CaseRepo::assign_lawyer(&pool, case.id, b.id, "lead").await.unwrap();
    let case_row = CaseRepo::find_by_id(&pool, case.id).await.unwrap().unwrap();
    assert_eq!(case_row.lead_lawyer_id, Some(b.id));
    let team = CaseRepo::list_team(&pool, case.id).await.unwrap();
    let roles: Vec<_> = team.iter().map(|t| (t.lawyer_id, t.role.as_str())).collect();
    assert_eq!(roles, vec![(b.id, "lead"), (a.id, "associate")]);

    // Removing the lead clears the case's lead lawyer.
    assert!(CaseRepo::unassign_lawyer(&pool, case.id, b.id).await.unwrap());
    assert!(!CaseRepo::unassign_lawyer(&pool, case.id, b.id).await.unwrap());
    let case_row = CaseRepo::find_by_id(&pool, case.id).await.unwrap().unwrap();
    assert_eq!(case_row.lead_lawyer_id, None);

    // Updating the lead through the case keeps the team in step.
    let update = UpdateCase {
        title: None,
        title_ar: None,
        description: None,
        client_id: None,
        lead_lawyer_id: Some(a.id),
        case_type: None,
        priority: Some("high".to_string()),
        court_name: None,
        court_reference: None,
        opponent_name: None,
        opened_on: None,
    };
    let updated = CaseRepo::update(&pool, case.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.priority, "high");
    let team = CaseRepo::list_team(&pool, case.id).await.unwrap();
    assert_eq!(team.len(), 1);
    assert_eq!(team[0].role, "lead");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_case_list_filters(pool: PgPool) {
    let acme = ClientRepo::create(&pool, &new_client("Acme"), None).await.unwrap();
    let other = ClientRepo::create(&pool, &new_client("Other"), None).await.unwrap();
    let lawyer = LawyerRepo::create(&pool, &new_lawyer("Omar", "L-9")).await.unwrap();

    let c1 = CaseRepo::create(&pool, "CASE-1", &new_case(acme.id, None, "Land dispute"), None)
        .await
        .unwrap();
    let c2 = CaseRepo::create(&pool, "CASE-2", &new_case(acme.id, None, "Contract"), None)
        .await
        .unwrap();
    CaseRepo::create(&pool, "CASE-3", &new_case(other.id, None, "Land appeal"), None)
        .await
        .unwrap();
    CaseRepo::assign_lawyer(&pool, c2.id, lawyer.id, "associate").await.unwrap();
    CaseRepo::change_status(&pool, c1.id, "closed", Some(Utc::now().date_naive()))
        .await
        .unwrap();

    let by_client = CaseQuery {
        client_id: Some(acme.id),
        ..Default::default()
    };
    assert_eq!(CaseRepo::count(&pool, &by_client).await.unwrap(), 2);

    let by_lawyer = CaseQuery {
        lawyer_id: Some(lawyer.id),
        ..Default::default()
    };
    let rows = CaseRepo::list(&pool, &by_lawyer, Page::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].case.id, c2.id);

    let search = CaseQuery {
        search: Some("land".to_string()),
        active_only: Some(true),
        ..Default::default()
    };
    let rows = CaseRepo::list(&pool, &search, Page::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].case.case_number, "CASE-3");

    let closed = CaseQuery {
        status: Some("closed".to_string()),
        ..Default::default()
    };
    let rows = CaseRepo::list(&pool, &closed, Page::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].case.closed_on.is_some());
}

// ---------------------------------------------------------------------------
// Hearings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_hearing_complete_with_follow_up(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Client"), None).await.unwrap();
    let case = CaseRepo::create(&pool, "C-1", &new_case(client.id, None, "Case"), None)
        .await
        .unwrap();
    let hearing = HearingRepo::create(&pool, &new_hearing(case.id, 2)).await.unwrap();
    assert_eq!(hearing.status, "scheduled");
    assert_eq!(hearing.hearing_type, "pleading");

    let input = CompleteHearing {
        outcome: "Adjourned for evidence".to_string(),
        next_hearing: Some(FollowUpHearing {
            scheduled_at: Utc::now() + Duration::days(30),
            hearing_type: Some("evidence".to_string()),
        }),
    };
    let (done, next) = HearingRepo::complete(&pool, hearing.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status, "completed");
    assert_eq!(done.outcome.as_deref(), Some("Adjourned for evidence"));
    let next = next.unwrap();
    assert_eq!(next.previous_hearing_id, Some(hearing.id));
    assert_eq!(next.hearing_type, "evidence");
    assert_eq!(next.court_name.as_deref(), Some("Riyadh General Court"));

    // A completed hearing cannot be completed, postponed or cancelled again.
    let err = HearingRepo::complete(&pool, hearing.id, &input).await.unwrap_err();
    assert_matches!(err, RepoError::Rule(_));
    let err = HearingRepo::cancel(&pool, hearing.id, None).await.unwrap_err();
    assert_matches!(err, RepoError::Rule(_));

    assert!(HearingRepo::complete(&pool, 999_999, &input).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_hearing_postpone_and_upcoming_window(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Client"), None).await.unwrap();
    let case = CaseRepo::create(&pool, "C-1", &new_case(client.id, None, "Case"), None)
        .await
        .unwrap();
    let soon = HearingRepo::create(&pool, &new_hearing(case.id, 1)).await.unwrap();
    let later = HearingRepo::create(&pool, &new_hearing(case.id, 20)).await.unwrap();
    HearingRepo::create(&pool, &new_hearing(case.id, -3)).await.unwrap();

    let upcoming = HearingRepo::upcoming(&pool, 7, None, 50).await.unwrap();
    let ids: Vec<_> = upcoming.iter().map(|h| h.hearing.id).collect();
    assert_eq!(ids, vec![soon.id]);
    assert_eq!(upcoming[0].case_number, "C-1");

    let moved = HearingRepo::postpone(
        &pool,
        later.id,
        Utc::now() + Duration::days(3),
        "Judge unavailable",
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.status, "postponed");
    assert_eq!(moved.postponement_reason.as_deref(), Some("Judge unavailable"));

    let upcoming = HearingRepo::upcoming(&pool, 7, None, 50).await.unwrap();
    assert_eq!(upcoming.len(), 2);

    let postponed = HearingQuery {
        status: Some("postponed".to_string()),
        ..Default::default()
    };
    assert_eq!(HearingRepo::count(&pool, &postponed).await.unwrap(), 1);

    // Hearings disappear with their case.
    assert!(CaseRepo::soft_delete(&pool, case.id).await.unwrap());
    let all = HearingQuery::default();
    assert_eq!(HearingRepo::count(&pool, &all).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_documents_by_owner(pool: PgPool) {
    let client = ClientRepo::create(&pool, &new_client("Client"), None).await.unwrap();
    let make = |entity_type: &str, entity_id: i64, title: &str| CreateDocument {
        entity_type: entity_type.to_string(),
        entity_id,
        title: title.to_string(),
        title_ar: None,
        document_type: None,
        file_name: format!("{title}.pdf"),
        file_path: format!("/storage/{title}.pdf"),
        mime_type: Some("application/pdf".to_string()),
        file_size_bytes: Some(1024),
        description: None,
    };

    let id_doc = DocumentRepo::create(&pool, &make("client", client.id, "passport"), None)
        .await
        .unwrap();
    assert_eq!(id_doc.document_type, "other");
    DocumentRepo::create(&pool, &make("client", client.id, "contract"), None)
        .await
        .unwrap();
    DocumentRepo::create(&pool, &make("case", client.id, "filing"), None)
        .await
        .unwrap();

    let params = DocumentQuery {
        entity_type: Some("client".to_string()),
        entity_id: Some(client.id),
        ..Default::default()
    };
    assert_eq!(DocumentRepo::count(&pool, &params).await.unwrap(), 2);

    DocumentRepo::soft_delete(&pool, id_doc.id).await.unwrap();
    assert_eq!(DocumentRepo::count(&pool, &params).await.unwrap(), 1);

    // Unknown owner types are rejected by the schema.
    let err = DocumentRepo::create(&pool, &make("court", 1, "x"), None)
        .await
        .unwrap_err();
    assert_matches!(&err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23514"));
}
