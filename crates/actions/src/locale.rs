//! Supported locales.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLocale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "es")]
    Es,
}

impl SupportedLocale {
    pub const DEFAULT: SupportedLocale = SupportedLocale::EnUs;

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedLocale::EnUs => "en-US",
            SupportedLocale::Es => "es",
        }
    }

    /// Path prefix for localized URLs. The default locale has none.
    pub fn intl_prefix(&self) -> String {
        if *self == Self::DEFAULT {
            String::new()
        } else {
            format!("/{}", self.as_str())
        }
    }

    pub fn flag_emoji(&self) -> &'static str {
        match self {
            SupportedLocale::EnUs => "🇺🇸",
            SupportedLocale::Es => "🇪🇸",
        }
    }
}

impl fmt::Display for SupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en-us" | "en" => Ok(SupportedLocale::EnUs),
            "es" => Ok(SupportedLocale::Es),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intl_prefix() {
        assert_eq!(SupportedLocale::EnUs.intl_prefix(), "");
        assert_eq!(SupportedLocale::Es.intl_prefix(), "/es");
    }

    #[test]
    fn test_parse_and_flags() {
        assert_eq!("en-US".parse::<SupportedLocale>().unwrap(), SupportedLocale::EnUs);
        assert_eq!("ES".parse::<SupportedLocale>().unwrap().flag_emoji(), "🇪🇸");
        assert!("fr".parse::<SupportedLocale>().is_err());
    }
}
