use super::entities::enums::SocialProvider;

/// What a provider reports about an account once the code exchange and
/// profile fetch are done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedAccountInfo {
    pub source: SocialProvider,
    pub username: String,
    pub realname: String,
    pub access_token: String,
    pub avatar: Option<String>,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}
