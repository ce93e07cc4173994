//! Auth challenge/response (§4.D). The real VATSIM algorithm is external to
//! this crate (§9 Open Question); [`ChallengeResponder`] is the pluggable
//! seam a real implementation substitutes into.

/// Opaque state threaded between successive challenge responses. The real
/// algorithm mixes each response into the next state; this keeps the seam
/// generic over whatever that state turns out to be shaped like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState(String);

impl AuthState {
    pub fn initial(seed: &str) -> Self {
        AuthState(seed.to_string())
    }
}

/// Produces the response to one FSD auth challenge.
///
/// Implementations must be deterministic given `(challenge, client_id,
/// private_key, prev_state)`, must return a fixed-length lowercase-hex
/// response, and must thread `prev_state` forward so later responses depend
/// on the sequence of prior challenges (§4.D).
pub trait ChallengeResponder {
    fn respond(&self, challenge: &str, client_id: u16, private_key: &str, prev_state: &AuthState) -> (String, AuthState);
}

/// A deterministic stand-in satisfying the §4.D contract without
/// reproducing VATSIM's real algorithm. Folds the challenge, client id,
/// private key, and previous state through a simple running hash and
/// renders it as 32 lowercase hex digits, matching the wire's response
/// length and alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubChallengeResponder;

impl ChallengeResponder for StubChallengeResponder {
    fn respond(&self, challenge: &str, client_id: u16, private_key: &str, prev_state: &AuthState) -> (String, AuthState) {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in prev_state
            .0
            .bytes()
            .chain(challenge.bytes())
            .chain(client_id.to_le_bytes())
            .chain(private_key.bytes())
        {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }

        let response = format!("{:016x}{:016x}", hash, hash.rotate_left(17));
        let next_state = AuthState(response.clone());
        (response, next_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_are_deterministic() {
        let responder = StubChallengeResponder;
        let state = AuthState::initial("seed");
        let (r1, _) = responder.respond("abc123", 42, "pw", &state);
        let (r2, _) = responder.respond("abc123", 42, "pw", &state);
        assert_eq!(r1, r2);
    }

    #[test]
    fn response_is_fixed_length_lowercase_hex() {
        let responder = StubChallengeResponder;
        let state = AuthState::initial("seed");
        let (response, _) = responder.respond("abc123", 42, "pw", &state);
        assert_eq!(response.len(), 32);
        assert!(response.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn state_threads_forward_across_challenges() {
        let responder = StubChallengeResponder;
        let state0 = AuthState::initial("seed");
        let (first, state1) = responder.respond("challenge-one", 42, "pw", &state0);
        let (second_from_fresh, _) = responder.respond("challenge-two", 42, "pw", &state0);
        let (second_from_prev, _) = responder.respond("challenge-two", 42, "pw", &state1);

        assert_ne!(first, second_from_fresh);
        assert_ne!(second_from_fresh, second_from_prev);
    }
}
