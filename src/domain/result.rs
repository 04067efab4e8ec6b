//! Result type alias for bisync

use super::errors::BisyncError;

/// Result type alias for bisync operations
///
/// # Examples
///
/// ```
/// use bisync::domain::result::Result;
/// use bisync::domain::errors::BisyncError;
///
/// fn failing_function() -> Result<()> {
///     Err(BisyncError::Configuration("missing delimiter".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BisyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
