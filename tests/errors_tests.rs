use std::error::Error;
use url_shortener::errors::{ErrorKind, Result, ShortcutError};

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_short_unavailable_error() {
        let error = ShortcutError::short_unavailable("short code 'ex1' is taken");

        assert!(matches!(error, ShortcutError::ShortUnavailable(_)));
        assert!(error.to_string().contains("Short Code Unavailable"));
        assert!(error.to_string().contains("ex1"));
    }

    #[test]
    fn test_not_deleted_error() {
        let error = ShortcutError::not_deleted("record is active");

        assert!(matches!(error, ShortcutError::NotDeleted(_)));
        assert_eq!(error.message(), "record is active");
        assert_eq!(error.code(), "E007");
    }

    #[test]
    fn test_prefix_not_found_error() {
        let error = ShortcutError::prefix_not_found("abcd1234");

        assert!(matches!(error, ShortcutError::PrefixNotFound(_)));
        assert!(error.to_string().contains("Admin Key Prefix Not Found"));
    }
}

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_caller_facing_kinds() {
        let cases = [
            (ShortcutError::invalid_record("x"), ErrorKind::InvalidInput),
            (ShortcutError::invalid_id("x"), ErrorKind::InvalidInput),
            (ShortcutError::short_unavailable("x"), ErrorKind::Conflict),
            (ShortcutError::id_not_found("x"), ErrorKind::NotFound),
            (ShortcutError::short_not_found("x"), ErrorKind::NotFound),
            (ShortcutError::full_not_found("x"), ErrorKind::NotFound),
            (ShortcutError::unauthorized("x"), ErrorKind::Unauthorized),
        ];
        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{:?}", error);
            assert!(!error.is_internal());
        }
    }

    #[test]
    fn test_internal_kinds() {
        for error in [
            ShortcutError::database_config("x"),
            ShortcutError::database_connection("x"),
            ShortcutError::database_operation("x"),
            ShortcutError::hashing("x"),
            ShortcutError::cancelled("x"),
            ShortcutError::deadline_exceeded("x"),
        ] {
            assert!(error.is_internal(), "{:?}", error);
        }
    }
}

#[cfg(test)]
mod error_trait_tests {
    use super::*;

    #[test]
    fn test_std_error_impl() {
        let error = ShortcutError::hashing("bad params");
        let boxed: Box<dyn Error> = Box::new(error.clone());

        assert_eq!(boxed.to_string(), error.format_simple());
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_result_alias() {
        fn fails() -> Result<()> {
            Err(ShortcutError::invalid_id("zzz"))
        }

        assert!(matches!(fails(), Err(ShortcutError::InvalidId(_))));
    }

    #[test]
    fn test_colored_format_contains_code() {
        colored::control::set_override(false);
        let error = ShortcutError::id_not_found("gone");
        let output = error.format_colored();

        assert!(output.contains("E004"));
        assert!(output.contains("ID Not Found"));
        assert!(output.contains("gone"));
    }
}
