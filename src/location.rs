use crate::core::{
    Coordinate,
    TaberuError,
};

pub const LOCATION_DENIED_MESSAGE: &str = "Cannot use GPS. Please check permissions";

pub trait LocationProvider {
    fn current_location(&self) -> Result<Coordinate, TaberuError>;
}

/// Location taken from settings or `TABERU_LOCATION`.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Result<Coordinate, TaberuError> {
        self.0.ok_or_else(|| TaberuError::LocationUnavailable(LOCATION_DENIED_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_location() {
        let here = Coordinate::new(39.74, -104.99);
        assert_eq!(FixedLocation(Some(here)).current_location().unwrap(), here);

        let err = FixedLocation(None).current_location().unwrap_err();
        assert!(matches!(err, TaberuError::LocationUnavailable(_)));
        assert_eq!(err.to_string(), LOCATION_DENIED_MESSAGE);
    }
}
