//! How a freshly created user gets the id shown in the table.

use clap::ValueEnum;

use crate::directory::UserId;

/// Display-id assignment for users appended after a successful create.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum IdPolicy {
    /// `list length + 1`, measured before the append; the server id is ignored.
    /// Collides after deletes or concurrent creates.
    #[default]
    ListLength,
    /// Keep the id the server assigned, or fall back to `ListLength` when the
    /// response has none.
    Server,
}

impl IdPolicy {
    pub fn assign(self, existing: usize, server_id: Option<UserId>) -> UserId {
        let by_length = UserId::from(existing as u64 + 1);
        match self {
            IdPolicy::ListLength => by_length,
            IdPolicy::Server => server_id.unwrap_or(by_length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_length_ignores_server_id() {
        assert_eq!(IdPolicy::ListLength.assign(1, Some(UserId::Number(11))), UserId::Number(2));
        assert_eq!(IdPolicy::ListLength.assign(0, None), UserId::Number(1));
    }

    #[test]
    fn server_policy_trusts_server_id() {
        assert_eq!(IdPolicy::Server.assign(1, Some(UserId::Number(11))), UserId::Number(11));
        assert_eq!(IdPolicy::Server.assign(4, None), UserId::Number(5));
    }
}
