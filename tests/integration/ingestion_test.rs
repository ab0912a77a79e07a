// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_db;
use personrs::domain::models::person::{
    CohabitantCandidate, CompanyCandidate, Person, ProfileCandidate, VehicleCandidate,
};
use personrs::domain::repositories::person_repository::PersonRepository;
use personrs::domain::repositories::task_repository::RepositoryError;
use personrs::domain::services::ingestion_service::{IngestError, IngestionService};
use personrs::infrastructure::repositories::person_repo_impl::PersonRepositoryImpl;
use std::sync::Arc;

fn full_candidate() -> ProfileCandidate {
    ProfileCandidate {
        full_name: Some("Anna Svensson".to_string()),
        age: Some("35".to_string()),
        city: Some("Stockholm".to_string()),
        address: Some("Storgatan 1 112 34 Stockholm".to_string()),
        phone_number: Some("070-1234567".to_string()),
        birthday: Some("Om 104 dagar fyller Anna 36 år".to_string()),
        national_id: Some("19900101-1234".to_string()),
        marital_status: Some("Gift".to_string()),
        cohabitants: vec![
            CohabitantCandidate {
                name: "Erik Svensson".to_string(),
                age: Some("38 år".to_string()),
            },
            CohabitantCandidate {
                name: "Lisa Svensson".to_string(),
                age: None,
            },
        ],
        vehicles: vec![VehicleCandidate {
            make_model: "Volvo V70".to_string(),
            model_year: Some("2018".to_string()),
            owner: Some("Anna Svensson".to_string()),
            registration: Some("ABC123".to_string()),
        }],
        companies: vec![CompanyCandidate {
            company_name: "Svensson Bygg AB".to_string(),
            position_title: Some("Styrelseledamot".to_string()),
            company_url: Some("https://example.com/bolag/1".to_string()),
        }],
    }
}

/// 测试档案落库
///
/// 验证首次落库创建档案与全部子记录，子记录顺序与候选一致。
#[tokio::test]
async fn test_ingest_creates_person_with_children() {
    let db = Arc::new(create_test_db().await);
    let repo = Arc::new(PersonRepositoryImpl::new(db));
    let service = IngestionService::new(repo.clone());

    let outcome = service.ingest(&full_candidate()).await.unwrap();
    assert!(outcome.created);
    assert_eq!(outcome.person.full_name, "Anna Svensson");

    let stored = repo
        .find_by_full_name("Anna Svensson")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, outcome.person.id);
    assert_eq!(stored.age.as_deref(), Some("35"));
    assert_eq!(stored.national_id.as_deref(), Some("19900101-1234"));

    assert_eq!(stored.cohabitants.len(), 2);
    assert_eq!(stored.cohabitants[0].name, "Erik Svensson");
    assert_eq!(stored.cohabitants[0].position, 0);
    assert_eq!(stored.cohabitants[1].name, "Lisa Svensson");
    assert_eq!(stored.cohabitants[1].position, 1);

    assert_eq!(stored.vehicles.len(), 1);
    assert_eq!(stored.vehicles[0].make_model, "Volvo V70");
    assert_eq!(stored.vehicles[0].registration.as_deref(), Some("ABC123"));

    assert_eq!(stored.companies.len(), 1);
    assert_eq!(stored.companies[0].company_name, "Svensson Bygg AB");
    assert_eq!(
        stored.companies[0].position_title.as_deref(),
        Some("Styrelseledamot")
    );
}

/// 测试重复落库的幂等性
///
/// 验证同名档案的第二次落库复用已有记录，不产生重复子记录。
#[tokio::test]
async fn test_reingest_same_name_reuses_record() {
    let db = Arc::new(create_test_db().await);
    let repo = Arc::new(PersonRepositoryImpl::new(db));
    let service = IngestionService::new(repo.clone());

    let first = service.ingest(&full_candidate()).await.unwrap();
    assert!(first.created);

    // A later scrape of the same person sees slightly different page content
    let mut updated = full_candidate();
    updated.age = Some("36".to_string());

    let second = service.ingest(&updated).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.person.id, first.person.id);
    // The stored profile is not overwritten
    assert_eq!(second.person.age.as_deref(), Some("35"));

    let stored = repo
        .find_by_full_name("Anna Svensson")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.cohabitants.len(), 2);
    assert_eq!(stored.vehicles.len(), 1);
    assert_eq!(stored.companies.len(), 1);
}

/// 测试缺少全名的候选被拒绝
#[tokio::test]
async fn test_ingest_without_name_is_rejected() {
    let db = Arc::new(create_test_db().await);
    let repo = Arc::new(PersonRepositoryImpl::new(db));
    let service = IngestionService::new(repo);

    let err = service
        .ingest(&ProfileCandidate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::MissingIdentity));
}

/// 测试唯一约束冲突
///
/// 验证绕过服务层的同名插入返回Conflict错误。
#[tokio::test]
async fn test_duplicate_insert_reports_conflict() {
    let db = Arc::new(create_test_db().await);
    let repo = PersonRepositoryImpl::new(db);

    let person = Person::from_candidate(&full_candidate()).unwrap();
    repo.insert(&person).await.unwrap();

    let duplicate = Person::from_candidate(&full_candidate()).unwrap();
    let err = repo.insert(&duplicate).await.unwrap_err();
    assert!(
        matches!(err, RepositoryError::Conflict(ref name) if name == "Anna Svensson"),
        "got: {:?}",
        err
    );
}

/// 测试按ID查询档案
#[tokio::test]
async fn test_find_by_id_loads_aggregate() {
    let db = Arc::new(create_test_db().await);
    let repo = PersonRepositoryImpl::new(db);

    let person = Person::from_candidate(&full_candidate()).unwrap();
    repo.insert(&person).await.unwrap();

    let found = repo.find_by_id(person.id).await.unwrap().unwrap();
    assert_eq!(found.full_name, "Anna Svensson");
    assert_eq!(found.cohabitants.len(), 2);

    assert!(repo
        .find_by_id(uuid::Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}
