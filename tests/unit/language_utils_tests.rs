/*!
 * Tests for ISO language code utilities
 */

use doctran::language_utils::{
    get_language_name, language_codes_match, normalize_to_part2t, validate_language_code,
};

#[test]
fn test_validate_language_code_withValidCodes_shouldSucceed() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("eng").is_ok());
    assert!(validate_language_code("zh").is_ok());
    assert!(validate_language_code("fre").is_ok()); // bibliographic French
}

#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("x").is_err());
    assert!(validate_language_code("xyz1").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_normalize_to_part2t_withTwoLetterCode_shouldExpand() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("zh").unwrap(), "zho");
}

#[test]
fn test_normalize_to_part2t_withBibliographicCode_shouldMapToTerminological() {
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
}

#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("FR", "fra"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "bogus"));
}

#[test]
fn test_get_language_name_withCommonCodes_shouldReturnEnglishNames() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}
