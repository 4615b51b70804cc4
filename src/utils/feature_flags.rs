/// Parses a boolean toggle the way `VERIFY_SSL` style variables are written.
///
/// Accepts `y`, `yes`, `t`, `true`, `on`, `1` and `n`, `no`, `f`, `false`,
/// `off`, `0` in any case. Anything else, including padded tokens such as
/// `" true "`, is rejected with a message naming the offending value.
pub fn parse_truth_value(value: impl AsRef<str>) -> Result<bool, String> {
    let raw = value.as_ref();
    match raw.to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(format!("invalid truth value '{}'", raw)),
    }
}

/// Reads an optional toggle, falling back to `default` when it is unset.
pub fn resolve_flag(raw: Option<&str>, default: bool) -> Result<bool, String> {
    match raw {
        Some(value) => parse_truth_value(value),
        None => Ok(default),
    }
}
