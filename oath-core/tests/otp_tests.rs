#![allow(missing_docs)]
use oath_core::OathError;
use oath_core::hmac::hmac_sha1;
use oath_core::hotp::{self, Digits, HotpOptions, Truncation, dynamic_truncation, otp_length};
use oath_core::totp::{self, DEFAULT_TIME_STEP, TotpParams, time_step_counter, window};

const SECRET: &[u8] = b"12345678901234567890";

// RFC 4226 appendix D.
const HOTP_VECTORS: [&str; 10] = [
    "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583", "399871",
    "520489",
];

#[test]
fn test_rfc4226_vectors() {
    for (counter, expected) in (0u64..).zip(HOTP_VECTORS) {
        let otp = hotp::generate(SECRET, counter, 6).expect("six digits are valid");
        assert_eq!(otp, expected, "counter {counter}");
    }
}

#[test]
fn test_rfc4226_truncated_values() {
    // Appendix D lists the decimal value before the modulo for counter 0.
    let hs = hmac_sha1(SECRET, &0u64.to_be_bytes());
    assert_eq!(hs.to_hex(), "cc93cf18508d94934c64b65d8ba7667fb7cde4b0");
    assert_eq!(dynamic_truncation(&hs), 1_284_755_224);
}

#[test]
fn test_truncation_clears_the_sign_bit() {
    let mut bytes = [0xffu8; 20];
    bytes[19] = 0xf0;
    assert_eq!(dynamic_truncation(&bytes.into()), 0x7fff_ffff);
}

#[test]
fn test_rfc6238_sha1_vectors() {
    let cases = [
        (59, "94287082"),
        (1_111_111_109, "07081804"),
        (1_111_111_111, "14050471"),
        (1_234_567_890, "89005924"),
        (2_000_000_000, "69279037"),
        (20_000_000_000, "65353130"),
    ];
    for (now, expected) in cases {
        let otp = totp::generate(SECRET, now, 30, 0, 8).expect("valid parameters");
        assert_eq!(otp, expected, "time {now}");
    }
}

#[test]
fn test_codes_are_zero_padded() {
    let otp = totp::generate(SECRET, 1_111_111_109, 30, 0, 8).expect("valid parameters");
    assert_eq!(otp.len(), 8);
    assert!(otp.starts_with('0'));
}

#[test]
fn test_every_valid_length_renders_exactly() {
    for digits in [6u8, 7, 8] {
        for counter in 0..20 {
            let otp = hotp::generate(SECRET, counter, digits).expect("valid length");
            assert_eq!(otp.len(), usize::from(digits));
            assert!(otp.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}

#[test]
fn test_invalid_digits_are_rejected() {
    for digits in [0u8, 5, 9, 10, 255] {
        let err = hotp::generate(SECRET, 0, digits).expect_err("length out of range");
        assert!(matches!(err, OathError::InvalidDigits(d) if d == digits));

        let err = totp::generate(SECRET, 59, 30, 0, digits).expect_err("length out of range");
        assert!(matches!(err, OathError::InvalidDigits(d) if d == digits));
    }
}

#[test]
fn test_generation_is_idempotent() {
    let first = totp::generate(SECRET, 1_234_567_890, 30, 0, 6).expect("valid");
    let second = totp::generate(SECRET, 1_234_567_890, 30, 0, 6).expect("valid");
    assert_eq!(first, second);
}

#[test]
fn test_options_have_no_effect() {
    let options = HotpOptions {
        add_checksum: true,
        truncation: Truncation::Offset(3),
    };
    for counter in 0..10u64 {
        let plain = hotp::generate(SECRET, counter, 6).expect("valid");
        let with_options =
            hotp::generate_with_options(SECRET, counter, 6, &options).expect("valid");
        assert_eq!(plain, with_options);
    }
    assert_eq!(otp_length(Digits::Six, true), 7);
    assert_eq!(otp_length(Digits::Eight, false), 8);
}

#[test]
fn test_codes_are_stable_within_a_step() {
    let start_offset = 1_000;
    let step = 60;
    let first = totp::generate(SECRET, start_offset + 120, step, start_offset, 6).expect("valid");
    for now in start_offset + 120..start_offset + 180 {
        let otp = totp::generate(SECRET, now, step, start_offset, 6).expect("valid");
        assert_eq!(otp, first, "time {now}");
    }
    let next = totp::generate(SECRET, start_offset + 180, step, start_offset, 6).expect("valid");
    assert_ne!(next, first);
}

#[test]
fn test_zero_step_falls_back_to_default() {
    assert_eq!(time_step_counter(89, 0, 0).expect("valid"), 2);
    assert_eq!(
        totp::generate(SECRET, 59, 0, 0, 8).expect("valid"),
        totp::generate(SECRET, 59, DEFAULT_TIME_STEP, 0, 8).expect("valid")
    );
}

#[test]
fn test_timestamp_before_start_offset_is_rejected() {
    let err = time_step_counter(99, 30, 100).expect_err("now precedes start");
    assert!(matches!(
        err,
        OathError::InvalidTimestamp {
            now: 99,
            start_offset: 100
        }
    ));
    assert!(totp::generate(SECRET, -1, 30, 0, 6).is_err());
}

#[test]
fn test_counter_spans_the_whole_timestamp_range() {
    assert_eq!(time_step_counter(i64::MAX, 1, i64::MIN).expect("valid"), u64::MAX);
    assert_eq!(time_step_counter(-30, 30, -90).expect("valid"), 2);
}

#[test]
fn test_window_contains_now_and_is_one_step_wide() {
    let range = window(1_111_111_111, 30, 0).expect("valid");
    assert_eq!(range, 1_111_111_110..1_111_111_140);
    assert!(range.contains(&1_111_111_111));

    let range = window(i64::MAX, 30, 0).expect("valid");
    assert!(range.contains(&(i64::MAX - 1)));
}

#[test]
fn test_params_generate_matches_free_function() {
    let params = TotpParams {
        step: 30,
        start_offset: 0,
        digits: Digits::Eight,
    };
    assert_eq!(params.generate(SECRET, 59).expect("valid"), "94287082");
    assert_eq!(params.window(59).expect("valid"), 30..60);
}

#[test]
fn test_params_json_roundtrip_uses_plain_digit_count() {
    let json = r#"{"step":60,"start_offset":10,"digits":7}"#;
    let params: TotpParams = serde_json::from_str(json).expect("valid config");
    assert_eq!(params.digits, Digits::Seven);
    assert_eq!(params.step, 60);
    assert_eq!(serde_json::to_string(&params).expect("serializable"), json);

    let defaults: TotpParams = serde_json::from_str("{}").expect("all fields default");
    assert_eq!(defaults, TotpParams::default());

    assert!(serde_json::from_str::<TotpParams>(r#"{"digits":9}"#).is_err());
}

#[test]
fn test_independent_computations_run_in_parallel() {
    fn assert_send<T: Send>() {}
    assert_send::<oath_core::sha1::Sha1>();
    assert_send::<TotpParams>();

    let codes: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0u64..10)
            .map(|counter| {
                scope.spawn(move || hotp::generate(SECRET, counter, 6).expect("six digits are valid"))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread panicked"))
            .collect()
    });

    assert_eq!(codes, HOTP_VECTORS);
}
