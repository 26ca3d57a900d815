use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How long an emailed code stays usable.
pub const CODE_TTL_MINUTES: i64 = 10;

/// A 4-digit email verification code and its expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Generate a fresh code in `1000..=9999` expiring `CODE_TTL_MINUTES` after `now`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let code = rand::rng().random_range(1000..=9999u16).to_string();
        Self {
            code,
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
        }
    }

    /// The code is usable only when it matches and `now` is strictly before expiry.
    pub fn accepts(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        self.code == candidate.trim() && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_is_four_digits() {
        for _ in 0..200 {
            let code = VerificationCode::generate(Utc::now());
            assert_eq!(code.code.len(), 4);
            assert!(code.code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.code.starts_with('0'));
        }
    }

    #[test]
    fn test_code_expires_after_ten_minutes() {
        let now = Utc::now();
        let code = VerificationCode::generate(now);
        let value = code.code.clone();

        assert!(code.accepts(&value, now + Duration::minutes(9)));
        assert!(!code.accepts(&value, now + Duration::minutes(10)));
        assert!(!code.accepts(&value, now + Duration::minutes(11)));
    }

    #[test]
    fn test_code_must_match() {
        let now = Utc::now();
        let code = VerificationCode {
            code: "4821".to_string(),
            expires_at: now + Duration::minutes(5),
        };
        assert!(code.accepts(" 4821 ", now));
        assert!(!code.accepts("4822", now));
    }
}
