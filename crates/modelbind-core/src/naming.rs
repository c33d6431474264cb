//! Identifier conversion between naming styles.
//!
//! Field names on records follow one naming style (lower camel case by
//! default) while incoming data often follows another (lower underscore for
//! most JSON APIs). [`convert`] translates between them word by word.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BindError;

/// A textual identifier convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `userName`
    LowerCamel,
    /// `UserName`
    UpperCamel,
    /// `user_name`
    LowerUnderscore,
    /// `USER_NAME`
    UpperUnderscore,
    /// `user-name`
    LowerHyphen,
}

impl NamingStyle {
    /// Returns the identifier used for this style in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowerCamel => "lower_camel",
            Self::UpperCamel => "upper_camel",
            Self::LowerUnderscore => "lower_underscore",
            Self::UpperUnderscore => "upper_underscore",
            Self::LowerHyphen => "lower_hyphen",
        }
    }

    fn split(self, identifier: &str) -> Vec<String> {
        match self {
            Self::LowerUnderscore | Self::UpperUnderscore => split_on(identifier, '_'),
            Self::LowerHyphen => split_on(identifier, '-'),
            Self::LowerCamel | Self::UpperCamel => split_camel(identifier),
        }
    }

    fn join(self, words: &[String]) -> String {
        match self {
            Self::LowerCamel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            Self::UpperCamel => words.iter().map(|w| capitalize(w)).collect(),
            Self::LowerUnderscore => join_with(words, "_", str::to_lowercase),
            Self::UpperUnderscore => join_with(words, "_", str::to_uppercase),
            Self::LowerHyphen => join_with(words, "-", str::to_lowercase),
        }
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingStyle {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lower_camel" | "camel" => Ok(Self::LowerCamel),
            "upper_camel" | "pascal" => Ok(Self::UpperCamel),
            "lower_underscore" | "snake" => Ok(Self::LowerUnderscore),
            "upper_underscore" | "screaming_snake" => Ok(Self::UpperUnderscore),
            "lower_hyphen" | "kebab" => Ok(Self::LowerHyphen),
            other => Err(BindError::ConfigurationError(format!(
                "Unknown naming style '{other}'"
            ))),
        }
    }
}

/// Converts `identifier` from one naming style to another.
///
/// # Examples
///
/// ```
/// use modelbind_core::naming::{convert, NamingStyle};
///
/// assert_eq!(
///     convert("user_name", NamingStyle::LowerUnderscore, NamingStyle::LowerCamel),
///     "userName"
/// );
/// assert_eq!(
///     convert("addressLine1", NamingStyle::LowerCamel, NamingStyle::UpperUnderscore),
///     "ADDRESS_LINE1"
/// );
/// ```
pub fn convert(identifier: &str, from: NamingStyle, to: NamingStyle) -> String {
    if from == to || identifier.is_empty() {
        return identifier.to_string();
    }
    to.join(&from.split(identifier))
}

/// Returns `true` when two identifiers differ only in case or word separators.
///
/// Used to spot source keys that were probably meant for a field but were
/// written in another naming style.
pub fn loosely_equal(a: &str, b: &str) -> bool {
    let squash = |s: &str| -> String {
        s.chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect()
    };
    squash(a) == squash(b)
}

fn split_on(identifier: &str, sep: char) -> Vec<String> {
    identifier
        .split(sep)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_camel(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in identifier.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

fn join_with(words: &[String], sep: &str, case: fn(&str) -> String) -> String {
    words.iter().map(|w| case(w)).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_to_lower_camel() {
        assert_eq!(
            convert("user_name", NamingStyle::LowerUnderscore, NamingStyle::LowerCamel),
            "userName"
        );
        assert_eq!(
            convert("created_at_utc", NamingStyle::LowerUnderscore, NamingStyle::LowerCamel),
            "createdAtUtc"
        );
    }

    #[test]
    fn test_lower_camel_to_underscore() {
        assert_eq!(
            convert("userName", NamingStyle::LowerCamel, NamingStyle::LowerUnderscore),
            "user_name"
        );
        assert_eq!(
            convert("addressLine1", NamingStyle::LowerCamel, NamingStyle::LowerUnderscore),
            "address_line1"
        );
    }

    #[test]
    fn test_upper_styles() {
        assert_eq!(
            convert("userName", NamingStyle::LowerCamel, NamingStyle::UpperUnderscore),
            "USER_NAME"
        );
        assert_eq!(
            convert("USER_NAME", NamingStyle::UpperUnderscore, NamingStyle::UpperCamel),
            "UserName"
        );
        assert_eq!(
            convert("UserName", NamingStyle::UpperCamel, NamingStyle::LowerHyphen),
            "user-name"
        );
    }

    #[test]
    fn test_single_word_and_identity() {
        assert_eq!(
            convert("name", NamingStyle::LowerCamel, NamingStyle::LowerUnderscore),
            "name"
        );
        assert_eq!(
            convert("Mixed_Thing", NamingStyle::LowerCamel, NamingStyle::LowerCamel),
            "Mixed_Thing"
        );
        assert_eq!(convert("", NamingStyle::LowerCamel, NamingStyle::UpperCamel), "");
    }

    #[test]
    fn test_round_trip_between_camel_and_underscore() {
        for name in ["id", "firstName", "homeAddressLine2", "x"] {
            let snake = convert(name, NamingStyle::LowerCamel, NamingStyle::LowerUnderscore);
            let back = convert(&snake, NamingStyle::LowerUnderscore, NamingStyle::LowerCamel);
            assert_eq!(back, name);
        }
    }

    #[test]
    fn test_loosely_equal() {
        assert!(loosely_equal("userName", "user_name"));
        assert!(loosely_equal("USER-NAME", "username"));
        assert!(!loosely_equal("userName", "userNames"));
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(
            "lower_underscore".parse::<NamingStyle>().unwrap(),
            NamingStyle::LowerUnderscore
        );
        assert_eq!("kebab".parse::<NamingStyle>().unwrap(), NamingStyle::LowerHyphen);
        assert_eq!("Upper-Camel".parse::<NamingStyle>().unwrap(), NamingStyle::UpperCamel);
        assert!("hungarian".parse::<NamingStyle>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&NamingStyle::UpperUnderscore).unwrap();
        assert_eq!(json, "\"upper_underscore\"");
        let back: NamingStyle = serde_json::from_str("\"lower_camel\"").unwrap();
        assert_eq!(back, NamingStyle::LowerCamel);
    }
}
