use sea_orm::{DeriveActiveEnum, EnumIter, prelude::StringLen};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SocialProvider {
    #[sea_orm(string_value = "WEIBO")]
    Weibo,
}

impl SocialProvider {
    /// Lower-case name used in routes and as the request cache key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Weibo => "weibo",
        }
    }
}

impl FromStr for SocialProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weibo" => Ok(SocialProvider::Weibo),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("weibo".parse::<SocialProvider>(), Ok(SocialProvider::Weibo));
        assert_eq!("WeiBo".parse::<SocialProvider>(), Ok(SocialProvider::Weibo));
        assert!("kakao".parse::<SocialProvider>().is_err());
    }

    #[test]
    fn test_serializes_upper_case() {
        let json = serde_json::to_string(&SocialProvider::Weibo).unwrap();
        assert_eq!(json, "\"WEIBO\"");
    }
}
