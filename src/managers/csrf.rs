use rand::{distr::Alphanumeric, Rng};

/// Header carrying the anti-forgery token on state-changing requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_LENGTH: usize = 32;

/// Random alphanumeric token bound to one session for its whole lifetime.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_fixed_length_alphanumeric() {
        let token = generate_token();

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_differ_between_calls() {
        assert_ne!(generate_token(), generate_token());
    }
}
