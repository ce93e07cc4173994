//! Pitch/bank/heading packing for the `@` and `^` position PDUs (§4.B).
//!
//! Packs all three axes plus the on-ground flag into a single 32-bit
//! unsigned integer, 1024 steps per axis. This bit layout is a wire
//! invariant: an encode followed by a decode of any legal triple must be an
//! identity within a quarter degree (§8).

/// Packs `(pitch, bank, heading, on_ground)` into the wire's 32-bit form.
pub fn encode_pitch_bank_heading(pitch: f64, bank: f64, heading: f64, on_ground: bool) -> u32 {
    let mut p = pitch / -360.0;
    if p < 0.0 {
        p += 1.0;
    }
    p *= 1024.0;

    let mut b = bank / -360.0;
    if b < 0.0 {
        b += 1.0;
    }
    b *= 1024.0;

    let h = heading / 360.0 * 1024.0;

    ((p as u32) << 22) | ((b as u32) << 12) | ((h as u32) << 2) | ((on_ground as u32) << 1)
}

/// Unpacks the wire's 32-bit pitch/bank/heading/on-ground form.
pub fn decode_pitch_bank_heading(input: u32) -> (f64, f64, f64, bool) {
    let on_ground = (input & 2) != 0;

    let mut input = input >> 2;
    let mut heading = (input & 1023) as f64;
    input >>= 10;
    let mut bank = (input & 1023) as f64;
    input >>= 10;
    let mut pitch = input as f64;

    pitch = pitch / 1024.0 * -360.0;
    if pitch > 180.0 {
        pitch -= 360.0;
    } else if pitch <= -180.0 {
        pitch += 360.0;
    }

    bank = bank / 1024.0 * -360.0;
    if bank > 180.0 {
        bank -= 360.0;
    } else if bank <= -180.0 {
        bank += 360.0;
    }

    heading = heading / 1024.0 * 360.0;
    if heading < 0.0 {
        heading += 360.0;
    } else if heading >= 360.0 {
        heading -= 360.0;
    }

    (pitch, bank, heading, on_ground)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    #[test]
    fn round_trips_known_values() {
        let (p, b, h, g) = decode_pitch_bank_heading(encode_pitch_bank_heading(0.0, 0.0, 0.0, false));
        assert_abs_diff_eq!(p, 0.0, epsilon = 0.4);
        assert_abs_diff_eq!(b, 0.0, epsilon = 0.4);
        assert_abs_diff_eq!(h, 0.0, epsilon = 0.4);
        assert!(!g);
    }

    #[test]
    fn round_trips_on_ground_flag() {
        let (_, _, _, g) = decode_pitch_bank_heading(encode_pitch_bank_heading(1.0, -2.0, 90.0, true));
        assert!(g);
    }

    #[test]
    fn round_trips_random_legal_triples() {
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let pitch = rng.gen_range(-90.0..90.0);
            let bank = rng.gen_range(-180.0..180.0);
            let heading = rng.gen_range(0.0..360.0);
            let on_ground = rng.gen_bool(0.5);

            let encoded = encode_pitch_bank_heading(pitch, bank, heading, on_ground);
            let (dp, db, dh, dg) = decode_pitch_bank_heading(encoded);

            assert_abs_diff_eq!(dp, pitch, epsilon = 0.4);
            assert_abs_diff_eq!(db, bank, epsilon = 0.4);

            let heading_diff = (dh - heading).abs().min(360.0 - (dh - heading).abs());
            assert!(heading_diff <= 0.4, "heading {} vs {}", dh, heading);
            assert_eq!(dg, on_ground);
        }
    }
}
