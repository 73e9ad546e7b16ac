//! Local input validation, applied before any network call is made.

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Minimum display-name length for new users.
pub const MIN_NAME_CHARS: usize = 5;

/// Syntactic well-formedness only: something before the `@`, a domain
/// with at least one dot-separated segment after it. Deliverability is
/// the server's problem.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
}

pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_CHARS
}
