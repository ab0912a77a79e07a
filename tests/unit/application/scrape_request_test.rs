// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use personrs::application::dto::scrape_request::ScrapeRequestDto;
use validator::Validate;

fn request(first_name: &str, last_name: &str, city: &str) -> ScrapeRequestDto {
    ScrapeRequestDto {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        city: city.to_string(),
    }
}

#[test]
fn test_complete_request_passes_validation() {
    assert!(request("Anna", "Svensson", "Stockholm").validate().is_ok());
}

#[test]
fn test_empty_fields_are_rejected() {
    let err = request("", "Svensson", "Stockholm").validate().unwrap_err();
    assert!(err.to_string().contains("first_name cannot be empty"));

    let err = request("Anna", "", "Stockholm").validate().unwrap_err();
    assert!(err.to_string().contains("last_name cannot be empty"));

    let err = request("Anna", "Svensson", "").validate().unwrap_err();
    assert!(err.to_string().contains("city cannot be empty"));
}

#[test]
fn test_request_deserializes_from_json() {
    let dto: ScrapeRequestDto = serde_json::from_str(
        r#"{"first_name": "Anna", "last_name": "Svensson", "city": "Stockholm"}"#,
    )
    .unwrap();

    assert_eq!(dto.first_name, "Anna");
    assert_eq!(dto.last_name, "Svensson");
    assert_eq!(dto.city, "Stockholm");
    assert!(dto.validate().is_ok());
}
