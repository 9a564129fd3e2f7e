//! End-to-end flow: sign in, submit scores and sanctions, read standings.

use std::sync::Arc;

use estudiantina_core::{
    EventConfig, NewIdentity, NewSanction, NewScore, Permission, Role, cohort_sheet,
    global_standings, podium, score_matrix,
};
use estudiantina_store::{
    DirectoryError, IdentityDirectory, SanctionLedger, ScoreLedger,
};
use tempfile::TempDir;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn juror_submissions_flow_into_standings() {
    let dir = TempDir::new().expect("temp dir");
    let config = Arc::new(EventConfig::default());

    let directory = IdentityDirectory::open(dir.path().join("identities.db"), Arc::clone(&config))
        .await
        .expect("directory");
    let scores = ScoreLedger::open(dir.path().join("scores.db"), Arc::clone(&config))
        .expect("score ledger");
    let sanctions = SanctionLedger::open(dir.path().join("sanctions.db"), Arc::clone(&config))
        .expect("sanction ledger");

    // The juror signs in with their identity number alone and holds the
    // submission permissions; callers check these before appending.
    let juror = directory.authenticate("3333").await.expect("juror sign-in");
    assert_eq!(juror.role, Role::Juror);
    assert!(juror.role.allows(Permission::SubmitScore));
    assert!(juror.role.allows(Permission::SubmitSanction));

    scores
        .append(NewScore {
            cohort: "5° A".to_string(),
            competition: "Fútbol".to_string(),
            value: 100,
        })
        .await
        .expect("first score");
    scores
        .append(NewScore {
            cohort: "5° A".to_string(),
            competition: "Vóley".to_string(),
            value: 50,
        })
        .await
        .expect("second score");
    let sanction = sanctions
        .append(NewSanction {
            cohort: "5° A".to_string(),
            reason_code: 12,
            registered_by_name: juror.display_name.clone(),
        })
        .await
        .expect("sanction");
    assert_eq!(sanction.points_deducted, 1.66);

    let score_snapshot = scores.list_all().await.expect("scores");
    let sanction_snapshot = sanctions.list_all().await.expect("sanctions");

    let standings = global_standings(&config, &score_snapshot, &sanction_snapshot);
    let leader = &standings[0];
    assert_eq!(leader.cohort, "5° A");
    assert_eq!(leader.total_score, 150);
    assert!(approx_eq(leader.total_sanctions, 1.66));
    assert!(approx_eq(leader.net_total, 148.34));

    let top = podium(&config, &score_snapshot, &sanction_snapshot);
    assert_eq!(top[0], standings[0]);

    let sheet = cohort_sheet(&config, &score_snapshot, &sanction_snapshot, "5° A")
        .expect("sheet");
    assert_eq!(sheet.total_score, leader.total_score);
    assert!(approx_eq(sheet.net_total, leader.net_total));

    let matrix = score_matrix(&config, &score_snapshot);
    let row = matrix.rows.iter().find(|r| r.cohort == "5° A").expect("row");
    let filled: Vec<Option<u32>> = row.cells.iter().copied().filter(Option::is_some).collect();
    assert_eq!(filled, vec![Some(100), Some(50)]);
}

#[tokio::test]
async fn director_registers_identities_and_blocked_stays_out() {
    let dir = TempDir::new().expect("temp dir");
    let config = Arc::new(EventConfig::default());
    let directory = IdentityDirectory::open(dir.path().join("identities.db"), Arc::clone(&config))
        .await
        .expect("directory");

    let director = directory.authenticate("49993070").await.expect("director");
    assert!(director.role.allows(Permission::RegisterIdentity));

    // Visitors hold no registration permission; the caller stops here.
    let visitor = directory.authenticate("7777").await.expect("visitor");
    assert!(!visitor.role.allows(Permission::RegisterIdentity));

    directory
        .register(NewIdentity {
            id: "40123456".to_string(),
            display_name: "Nadia Suarez".to_string(),
            role: Role::Student,
            cohort: Some("2° C".to_string()),
        })
        .await
        .expect("registration");
    let student = directory.authenticate("40123456").await.expect("student");
    assert_eq!(student.cohort.as_deref(), Some("2° C"));

    assert!(matches!(
        directory.authenticate("8888").await.unwrap_err(),
        DirectoryError::Forbidden { .. },
    ));
}

#[tokio::test]
async fn concurrent_appends_serialize_without_loss() {
    let config = Arc::new(EventConfig::default());
    let scores = Arc::new(ScoreLedger::in_memory(Arc::clone(&config)).expect("ledger"));

    let mut handles = Vec::new();
    for value in 0..20u32 {
        let scores = Arc::clone(&scores);
        handles.push(tokio::spawn(async move {
            scores
                .append(NewScore {
                    cohort: "1° A".to_string(),
                    competition: "Fútbol".to_string(),
                    value,
                })
                .await
                .expect("append")
                .id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("join"));
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert_eq!(scores.count().await.expect("count"), 20);
}
