//! End-to-end validation scenarios over realistic search requests.

use chrono::{TimeZone, Utc};
use romapi_search::error::SearchError;
use romapi_search::types::{
    DateRange, DistanceUnit, GeoFilter, Pagination, PriceRange, ResourcePlan, ResourceType,
    SearchFilters, SearchRequest,
};
use romapi_search::validator::{QueryValidator, ValidationOptions};

fn full_request() -> SearchRequest {
    SearchRequest {
        query: Some("restaurants camerounais".to_string()),
        filters: SearchFilters {
            categories: vec!["6fa459ea-ee8a-3ca4-894e-db77e160355e".to_string()],
            resource_types: vec![ResourceType::Business],
            plans: vec![ResourcePlan::Premium],
            price_range: Some(PriceRange {
                min: Some(1000.0),
                max: Some(50000.0),
            }),
            location: Some(GeoFilter {
                latitude: 4.0511,
                longitude: 9.7679,
                radius: 25.0,
                unit: DistanceUnit::Km,
            }),
            city: Some("Douala".to_string()),
            tags: vec!["cuisine".to_string(), "livraison".to_string()],
            date_range: Some(DateRange {
                from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                to: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            }),
            ..Default::default()
        },
        pagination: Pagination {
            page: Some(1),
            limit: Some(20),
            offset: None,
        },
        facets: vec!["categories".to_string(), "cities".to_string()],
        language: Some("fr".to_string()),
        ..Default::default()
    }
}

#[test]
fn realistic_request_passes_untouched() {
    let validator = QueryValidator::default();
    let result = validator.validate(&full_request());
    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
    assert_eq!(result.sanitized.query.as_deref(), Some("restaurants camerounais"));
    assert_eq!(result.sanitized.filters.city.as_deref(), Some("Douala"));
}

#[test]
fn injection_attempts_are_collected_across_fields() {
    let validator = QueryValidator::default();
    let mut request = full_request();
    request.query = Some("x UNION SELECT password FROM users".to_string());
    request.filters.city = Some("<script>alert(1)</script>".to_string());
    request.filters.tags = vec!["{{constructor}}".to_string()];

    let result = validator.validate(&request);
    assert!(!result.is_valid);
    assert!(result.errors.len() >= 3);
    // Sanitized copy carries none of the payloads
    assert!(!result.sanitized.query.unwrap_or_default().to_lowercase().contains("union select"));
    let city = result.sanitized.filters.city.unwrap_or_default();
    assert!(!city.contains('<') && !city.contains('>') && !city.contains('('));
    assert!(!result.sanitized.filters.tags[0].contains('{'));
}

#[test]
fn validate_or_reject_returns_sanitized_request() {
    let validator = QueryValidator::default();
    let mut request = full_request();
    request.query = Some("  pizza   \"italienne\"  ".to_string());

    let sanitized = validator.validate_or_reject(&request).unwrap();
    assert_eq!(sanitized.query.as_deref(), Some("pizza italienne"));
}

#[test]
fn validate_or_reject_surfaces_structured_errors() {
    let validator = QueryValidator::default();
    let mut request = full_request();
    request.filters.location = Some(GeoFilter {
        latitude: 4.0,
        longitude: 9.0,
        radius: 5000.0,
        unit: DistanceUnit::Km,
    });
    request.pagination.limit = Some(500);

    match validator.validate_or_reject(&request) {
        Err(SearchError::InvalidParams { errors, .. }) => {
            assert!(errors.iter().any(|e| e.contains("radius")));
            assert!(errors.iter().any(|e| e.contains("limit")));
        }
        other => panic!("expected InvalidParams, got {other:?}"),
    }
}

#[test]
fn strict_mode_tightens_without_changing_sanitization() {
    let lenient = QueryValidator::default();
    let strict = QueryValidator::new(ValidationOptions {
        strict_mode: true,
        ..Default::default()
    });
    let mut request = full_request();
    request.query = Some("pizza & pasta".to_string());

    let lenient_result = lenient.validate(&request);
    let strict_result = strict.validate(&request);
    assert!(lenient_result.is_valid);
    assert!(!strict_result.is_valid);
    assert_eq!(lenient_result.sanitized.query, strict_result.sanitized.query);
}

#[test]
fn filter_count_includes_every_populated_group() {
    let request = full_request();
    // categories + types + plans + price + location + city + 2 tags + dates
    assert_eq!(request.filters.count(), 9);
}
