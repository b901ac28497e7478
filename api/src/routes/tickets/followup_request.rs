use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FollowupRequest {
    pub question: String,
}
