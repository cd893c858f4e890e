use jiff::{SignedDuration, SpanRelativeTo};

/// Parses `30s`, `PT2M`, `1m 30s` or a plain number of seconds. Negative
/// durations are rejected.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<jiff::Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<i64>().ok().map(SignedDuration::from_secs))
        .ok_or_else(|| format!("Invalid duration '{input}'"))?;

    if duration.is_negative() {
        return Err(format!("Duration '{input}' is negative"));
    }

    Ok(duration)
}
