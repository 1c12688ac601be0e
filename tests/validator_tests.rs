use diskstat_api::{validate, HostnamePolicy, HostnameValidator, DEFAULT_MAX_HOSTNAME_LEN};

#[test]
fn test_empty_is_always_rejected() {
    assert!(!validate(""));
    assert!(!HostnameValidator::new(HostnamePolicy::Permissive, 64).validate(""));
    assert!(!HostnameValidator::new(HostnamePolicy::Strict, 64).validate(""));
}

#[test]
fn test_default_validator_is_strict() {
    let validator = HostnameValidator::default();
    assert_eq!(validator.policy(), HostnamePolicy::Strict);

    for ok in ["sda1", "nvme0n1p2", "dm-0", "md127", "vg0.root", "loop_3"] {
        assert!(validator.validate(ok), "{ok:?} should be accepted");
        assert!(validate(ok));
    }
}

#[test]
fn test_strict_rejects_path_and_shell_characters() {
    let validator = HostnameValidator::default();
    for bad in [
        "../etc/passwd",
        "sda/../../root",
        "sda1;rm -rf /",
        "sda 1",
        "-sda",
        ".hidden",
        "a..b",
        "$(id)",
        "sda1\n",
    ] {
        assert!(!validator.validate(bad), "{bad:?} should be rejected");
    }
}

#[test]
fn test_strict_length_bound() {
    let validator = HostnameValidator::default();
    let at_limit = "a".repeat(DEFAULT_MAX_HOSTNAME_LEN);
    let over_limit = "a".repeat(DEFAULT_MAX_HOSTNAME_LEN + 1);

    assert!(validator.validate(&at_limit));
    assert!(!validator.validate(&over_limit));
}

#[test]
fn test_permissive_accepts_any_non_empty_string() {
    let validator = HostnameValidator::new(HostnamePolicy::Permissive, 1);
    for candidate in ["sda1", "../etc/passwd", "with space", "ünïcode", "x".repeat(500).as_str()]
    {
        assert!(validator.validate(candidate), "{candidate:?} should be accepted");
    }
}

#[test]
fn test_policy_parsing() {
    assert_eq!("strict".parse::<HostnamePolicy>(), Ok(HostnamePolicy::Strict));
    assert_eq!(
        "permissive".parse::<HostnamePolicy>(),
        Ok(HostnamePolicy::Permissive)
    );
    assert!("lenient".parse::<HostnamePolicy>().is_err());
}
