/// A trusted rater assigned to rate submissions in a channel
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RaterAssignment {
    pub userid: String,
    pub channelid: String,
    pub meta: String,
}
