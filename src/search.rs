use crate::directory::User;

/// True when the already lower-cased `needle` occurs in the user's name or email.
pub fn matches(user: &User, needle: &str) -> bool {
    needle.is_empty()
        || user.name.to_lowercase().contains(needle)
        || user.email.to_lowercase().contains(needle)
}

/// Lazy view over `users` keeping the entries whose name or email contains
/// `query`, ignoring case. The iterator can be cloned to walk the view again.
pub fn filter_users<'a>(
    users: &'a [User],
    query: &str,
) -> impl Iterator<Item = &'a User> + Clone + use<'a> {
    let needle = query.to_lowercase();
    users.iter().filter(move |u| matches(u, &needle))
}
