use rand::{thread_rng, Rng};
use subtle::ConstantTimeEq;

/// Six decimal digits, never with a leading zero so the SMS text is unambiguous.
pub fn generate_code() -> String {
    thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn codes_match(submitted: &str, stored: &str) -> bool {
    if submitted.len() != stored.len() {
        return false;
    }
    submitted.as_bytes().ct_eq(stored.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn comparison_handles_length_mismatch() {
        assert!(codes_match("123456", "123456"));
        assert!(!codes_match("123456", "123457"));
        assert!(!codes_match("12345", "123456"));
    }
}
