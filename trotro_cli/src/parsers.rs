use jiff::SpanRelativeTo;
use trotro_optimizer::solver::engine_params::EngineOption;

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<f64>()
        .map_err(|_| ())
        .and_then(|seconds| {
            jiff::SignedDuration::try_from_secs_f64(seconds.abs()).map_err(|_| ())
        })
    {
        return Ok(duration);
    }

    Err(String::from("Invalid duration"))
}

/// Parses `key=value`. The value is typed as bool, then integer, then float,
/// then text.
pub fn parse_engine_option(input: &str) -> Result<(String, EngineOption), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{input}`"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option name in `{input}`"));
    }

    match value.trim().parse::<EngineOption>() {
        Ok(value) => Ok((key.to_owned(), value)),
        Err(never) => match never {},
    }
}
