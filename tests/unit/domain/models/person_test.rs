// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use personrs::domain::models::person::{
    CohabitantCandidate, CompanyCandidate, Person, ProfileCandidate, VehicleCandidate,
};

#[test]
fn test_from_candidate_builds_full_aggregate() {
    // Given: 带有全部子记录的抽取候选
    let candidate = ProfileCandidate {
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
                name: "N/A".to_string(),
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
    };

    // When: 构建档案聚合
    let person = Person::from_candidate(&candidate).unwrap();

    // Then: 标量与子记录全部转入，子记录携带档案ID与顺序号
    assert_eq!(person.full_name, "Anna Svensson");
    assert_eq!(person.age.as_deref(), Some("35"));
    assert_eq!(person.marital_status.as_deref(), Some("Gift"));

    assert_eq!(person.cohabitants.len(), 2);
    assert_eq!(person.cohabitants[0].name, "Erik Svensson");
    assert_eq!(person.cohabitants[0].position, 0);
    assert_eq!(person.cohabitants[1].name, "N/A");
    assert_eq!(person.cohabitants[1].position, 1);
    assert!(person
        .cohabitants
        .iter()
        .all(|c| c.person_id == person.id));

    assert_eq!(person.vehicles.len(), 1);
    assert_eq!(person.vehicles[0].make_model, "Volvo V70");
    assert_eq!(person.vehicles[0].person_id, person.id);

    assert_eq!(person.companies.len(), 1);
    assert_eq!(person.companies[0].company_name, "Svensson Bygg AB");
    assert_eq!(person.companies[0].person_id, person.id);
}

#[test]
fn test_from_candidate_requires_full_name() {
    // 没有全名的候选无法确定档案身份
    let empty = ProfileCandidate::default();
    assert!(Person::from_candidate(&empty).is_none());

    // 空白全名同样被拒绝
    let blank = ProfileCandidate {
        full_name: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(Person::from_candidate(&blank).is_none());
}

#[test]
fn test_from_candidate_trims_full_name() {
    let candidate = ProfileCandidate {
        full_name: Some("  Anna Svensson \n".to_string()),
        ..Default::default()
    };

    let person = Person::from_candidate(&candidate).unwrap();
    assert_eq!(person.full_name, "Anna Svensson");
    assert!(person.cohabitants.is_empty());
    assert!(person.vehicles.is_empty());
    assert!(person.companies.is_empty());
}
