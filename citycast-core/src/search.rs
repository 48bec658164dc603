use crate::error::ValidationError;

/// Minimum number of characters accepted as a city name.
pub const MIN_CITY_LEN: usize = 2;

/// Trim raw input and check it is long enough to be worth a request.
pub fn validate_city(input: &str) -> Result<&str, ValidationError> {
    let city = input.trim();

    if city.is_empty() {
        return Err(ValidationError::Empty);
    }
    if city.chars().count() < MIN_CITY_LEN {
        return Err(ValidationError::TooShort);
    }

    Ok(city)
}
