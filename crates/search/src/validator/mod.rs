//! Validation and sanitization of untrusted search parameters.
//!
//! [`QueryValidator::validate`] runs independent checks per field group
//! and unions their errors and warnings; it never fails on malformed
//! input. Only the [`QueryValidator::validate_or_reject`] adapter turns a
//! failed validation into a client-visible [`SearchError::InvalidParams`].
//!
//! Sanitization strips dangerous characters and blacklist matches
//! literally (no escaping) and collapses whitespace; it is idempotent, so
//! a sanitized request can safely pass through the validator again.

mod patterns;

pub use patterns::{ALLOWED_FACETS, DANGEROUS_CHARS, SUSPICIOUS_PATTERNS, sanitize};

use chrono::{Datelike, Utc};

use crate::error::{SearchError, SearchResult};
use crate::language::SupportedLanguage;
use crate::types::{
    DateRange, GeoFilter, Pagination, PriceRange, SearchFilters, SearchRequest,
};

/// Tunable validation bounds. All fields are overridable; defaults match
/// the platform's production limits.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub max_query_length: usize,
    pub max_filters_count: usize,
    pub allowed_resource_types: Vec<crate::types::ResourceType>,
    pub allowed_plans: Vec<crate::types::ResourcePlan>,
    /// Upper price bound, in the platform currency (10M FCFA).
    pub max_price: f64,
    /// Maximum geo radius in kilometres.
    pub max_geo_radius: f64,
    /// When set, dangerous characters are errors instead of warnings.
    pub strict_mode: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_query_length: 200,
            max_filters_count: 50,
            allowed_resource_types: crate::types::ResourceType::ALL.to_vec(),
            allowed_plans: crate::types::ResourcePlan::ALL.to_vec(),
            max_price: 10_000_000.0,
            max_geo_radius: 1000.0,
            strict_mode: false,
        }
    }
}

/// Outcome of validating one request.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Copy of the request with dangerous content stripped. When
    /// `is_valid` holds, this contains no blacklisted pattern match.
    pub sanitized: SearchRequest,
}

/// Stateless validator for raw search parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryValidator {
    options: ValidationOptions,
}

impl QueryValidator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// Validate a request, collecting all errors and warnings. Never
    /// fails for malformed input.
    pub fn validate(&self, request: &SearchRequest) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Some(query) = &request.query {
            self.validate_query(query, &mut errors, &mut warnings);
        }
        self.validate_filters(&request.filters, &mut errors);
        validate_pagination(&request.pagination, &mut errors);
        validate_facets(&request.facets, &mut errors);
        if let Some(language) = &request.language {
            if SupportedLanguage::parse(language).is_none() {
                errors.push(format!("unsupported language: {language}"));
            }
        }

        let is_valid = errors.is_empty();
        if !is_valid {
            tracing::warn!(errors = ?errors, "search validation failed");
        }

        ValidationResult {
            is_valid,
            errors,
            warnings,
            sanitized: sanitize_request(request),
        }
    }

    /// Validate and return the sanitized request, or a client-visible
    /// [`SearchError::InvalidParams`] carrying the full error list.
    pub fn validate_or_reject(&self, request: &SearchRequest) -> SearchResult<SearchRequest> {
        let result = self.validate(request);
        if result.is_valid {
            Ok(result.sanitized)
        } else {
            Err(SearchError::InvalidParams {
                errors: result.errors,
                warnings: result.warnings,
            })
        }
    }

    fn validate_query(&self, query: &str, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
        if query.chars().count() > self.options.max_query_length {
            errors.push(format!(
                "query too long (max {} characters)",
                self.options.max_query_length
            ));
        }

        if patterns::contains_suspicious_patterns(query) {
            errors.push("query contains disallowed characters or patterns".to_string());
        }

        if patterns::contains_dangerous_chars(query) {
            if self.options.strict_mode {
                errors.push("query contains dangerous characters".to_string());
            } else {
                warnings.push("query contains characters that will be stripped".to_string());
            }
        }

        let trimmed = query.trim();
        if trimmed.is_empty() {
            warnings.push("query is empty".to_string());
        } else if trimmed.chars().count() < 2 {
            warnings.push("query is very short, results may be limited".to_string());
        }
    }

    fn validate_filters(&self, filters: &SearchFilters, errors: &mut Vec<String>) {
        if filters.count() > self.options.max_filters_count {
            errors.push(format!(
                "too many filters (max {})",
                self.options.max_filters_count
            ));
        }

        if filters.categories.len() > 20 {
            errors.push("too many categories selected (max 20)".to_string());
        }
        for category_id in &filters.categories {
            if !patterns::is_valid_uuid(category_id) {
                errors.push(format!("invalid category id: {category_id}"));
            }
        }

        for resource_type in &filters.resource_types {
            if !self.options.allowed_resource_types.contains(resource_type) {
                errors.push(format!("resource type not allowed: {resource_type}"));
            }
        }
        for plan in &filters.plans {
            if !self.options.allowed_plans.contains(plan) {
                errors.push(format!("plan not allowed: {plan}"));
            }
        }

        if let Some(price_range) = &filters.price_range {
            self.validate_price_range(price_range, errors);
        }
        if let Some(location) = &filters.location {
            self.validate_geo_filter(location, errors);
        }

        if let Some(city) = &filters.city {
            validate_text_filter(city, "city", errors);
        }
        if let Some(region) = &filters.region {
            validate_text_filter(region, "region", errors);
        }
        if let Some(country) = &filters.country {
            validate_text_filter(country, "country", errors);
        }

        if filters.tags.len() > 50 {
            errors.push("too many tags selected (max 50)".to_string());
        }
        for tag in &filters.tags {
            if tag.chars().count() > 50 {
                errors.push(format!("tag too long: {tag} (max 50 characters)"));
            }
            if patterns::contains_suspicious_patterns(tag) {
                errors.push(format!("tag contains disallowed characters: {tag}"));
            }
        }

        if let Some(date_range) = &filters.date_range {
            validate_date_range(date_range, errors);
        }
    }

    fn validate_price_range(&self, price_range: &PriceRange, errors: &mut Vec<String>) {
        if let Some(min) = price_range.min {
            if min < 0.0 {
                errors.push("minimum price cannot be negative".to_string());
            }
            if min > self.options.max_price {
                errors.push(format!(
                    "minimum price too high (max {})",
                    self.options.max_price
                ));
            }
        }
        if let Some(max) = price_range.max {
            if max < 0.0 {
                errors.push("maximum price cannot be negative".to_string());
            }
            if max > self.options.max_price {
                errors.push(format!(
                    "maximum price too high (max {})",
                    self.options.max_price
                ));
            }
        }
        if let (Some(min), Some(max)) = (price_range.min, price_range.max) {
            if min > max {
                errors.push("minimum price cannot exceed maximum price".to_string());
            }
        }
    }

    fn validate_geo_filter(&self, geo: &GeoFilter, errors: &mut Vec<String>) {
        if !(-90.0..=90.0).contains(&geo.latitude) {
            errors.push("latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&geo.longitude) {
            errors.push("longitude must be between -180 and 180".to_string());
        }
        if geo.radius <= 0.0 {
            errors.push("radius must be positive".to_string());
        }
        if geo.radius > self.options.max_geo_radius {
            errors.push(format!(
                "radius too large (max {} km)",
                self.options.max_geo_radius
            ));
        }
    }
}

fn validate_text_filter(text: &str, field: &str, errors: &mut Vec<String>) {
    if text.chars().count() > 100 {
        errors.push(format!("{field} is too long (max 100 characters)"));
    }
    if patterns::contains_suspicious_patterns(text) {
        errors.push(format!("{field} contains disallowed characters"));
    }
}

fn validate_pagination(pagination: &Pagination, errors: &mut Vec<String>) {
    if let Some(page) = pagination.page {
        if page < 1 {
            errors.push("page must be a positive integer".to_string());
        }
        if page > 1000 {
            errors.push("page number too high (max 1000)".to_string());
        }
    }
    if let Some(limit) = pagination.limit {
        if limit < 1 {
            errors.push("limit must be a positive integer".to_string());
        }
        if limit > 100 {
            errors.push("limit too high (max 100)".to_string());
        }
    }
    // offset is unsigned; nothing below zero to reject
}

fn validate_facets(facets: &[String], errors: &mut Vec<String>) {
    if facets.len() > 20 {
        errors.push("too many facets requested (max 20)".to_string());
    }
    for facet in facets {
        if !ALLOWED_FACETS.contains(&facet.as_str()) {
            errors.push(format!("facet not allowed: {facet}"));
        }
    }
}

fn validate_date_range(date_range: &DateRange, errors: &mut Vec<String>) {
    if let (Some(from), Some(to)) = (date_range.from, date_range.to) {
        if from > to {
            errors.push("start date cannot be after end date".to_string());
        }
    }

    // Bounded historical/future window around the current year
    let now = Utc::now();
    if let Some(from) = date_range.from {
        if from.year() < now.year() - 50 {
            errors.push("start date is too far in the past".to_string());
        }
    }
    if let Some(to) = date_range.to {
        if to.year() > now.year() + 10 {
            errors.push("end date is too far in the future".to_string());
        }
    }
}

/// Produces the sanitized copy of a request: free-text fields are passed
/// through [`sanitize`], everything structured is kept as-is.
fn sanitize_request(request: &SearchRequest) -> SearchRequest {
    let mut sanitized = request.clone();
    if let Some(query) = &sanitized.query {
        sanitized.query = Some(sanitize(query));
    }
    if let Some(city) = &sanitized.filters.city {
        sanitized.filters.city = Some(sanitize(city));
    }
    if let Some(region) = &sanitized.filters.region {
        sanitized.filters.region = Some(sanitize(region));
    }
    if let Some(country) = &sanitized.filters.country {
        sanitized.filters.country = Some(sanitize(country));
    }
    sanitized.filters.tags = sanitized.filters.tags.iter().map(|t| sanitize(t)).collect();
    sanitized
}
