mod common;

use async_graphql::{value, Variables};
use common::*;
use portal_api::gql::build_schema;
use serde_json::json;

#[tokio::test]
async fn test_club_views() {
    let app = test_app().await;
    let club = register_club(&app.state, OWNER, "Tiger TKD").await;
    let service = app.state.registration();
    service
        .add_competitor(&club, competitor("IC-1", "Aina Sofea", dob(2020, 1, 15)), today())
        .await
        .unwrap();
    service.add_coach(&club, coach("TM-1", "Team Manager")).await.unwrap();

    let schema = build_schema(app.state.clone());
    let query = r#"
        query Club($clubId: String!) {
            club(clubId: $clubId) { name totalFee }
            competitors(clubId: $clubId) { idNumber category events fee }
            coaches(clubId: $clubId) { teamManagers coachCount maxCoaches canAdd coaches { tagType } }
            demoTeam(clubId: $clubId) { size complete teamFee }
            payment(clubId: $clubId) { status fee canConfirm }
        }
    "#;
    let vars = Variables::from_json(json!({ "clubId": club.club_id }));
    let response = execute_graphql(&schema, query, Some(vars), Some(claims(OWNER))).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({
            "club": { "name": "Tiger TKD", "totalFee": 110 },
            "competitors": [
                { "idNumber": "IC-1", "category": "4-6", "events": "sparring", "fee": 110 }
            ],
            "coaches": {
                "teamManagers": 1,
                "coachCount": 0,
                "maxCoaches": 3,
                "canAdd": true,
                "coaches": [{ "tagType": "Team Manager" }]
            },
            "demoTeam": { "size": 0, "complete": false, "teamFee": 120 },
            "payment": { "status": "NONE", "fee": 110, "canConfirm": true }
        })
    );
}

#[tokio::test]
async fn test_club_queries_check_ownership() {
    let app = test_app().await;
    let club = register_club(&app.state, OWNER, "Tiger TKD").await;
    let schema = build_schema(app.state.clone());

    let query = "query($clubId: String!) { competitors(clubId: $clubId) { idNumber } }";
    let vars = || Some(Variables::from_json(json!({ "clubId": club.club_id })));

    let response = execute_graphql(&schema, query, vars(), Some(claims(RIVAL))).await;
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "You do not manage this club.");

    let response = execute_graphql(&schema, query, vars(), None).await;
    assert_eq!(response.errors[0].message, "Authentication required");
}

#[tokio::test]
async fn test_my_club_is_null_before_registration() {
    let app = test_app().await;
    let schema = build_schema(app.state.clone());

    let response = execute_graphql(&schema, "{ myClub { name } }", None, Some(claims(OWNER))).await;
    assert!(response.errors.is_empty());
    assert_eq!(response.data, value!({ "myClub": null }));
}
