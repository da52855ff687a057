//! Forwarded argument handling for `playwright test`
//!
//! The `test` subcommand accepts arbitrary Playwright flags alongside its own
//! `--url` and `--skip-reporter`. The sequencer flags are picked out here and
//! stripped before the rest is handed to Playwright verbatim.

pub const URL_FLAG: &str = "--url";
pub const SKIP_REPORTER_FLAG: &str = "--skip-reporter";

/// True when `token` is a value for `--url` rather than another flag
fn is_flag_value(token: &str) -> bool {
    !token.starts_with('-')
}

/// Drop sequencer-only flags, keeping every other token in order
///
/// Removes `--url <value>`, `--url=<value>`, a bare `--url` and
/// `--skip-reporter`. Applying it twice gives the same result as once.
pub fn filter_forwarded_args(args: &[String]) -> Vec<String> {
    let mut forwarded = Vec::with_capacity(args.len());
    let mut tokens = args.iter().peekable();

    while let Some(token) = tokens.next() {
        if token == URL_FLAG {
            tokens.next_if(|next| is_flag_value(next));
            continue;
        }
        if token.starts_with("--url=") || token == SKIP_REPORTER_FLAG {
            continue;
        }
        forwarded.push(token.clone());
    }

    forwarded
}

/// Value of the last `--url` in `args`, if it carries one
pub fn extract_url(args: &[String]) -> Option<String> {
    let mut url = None;
    let mut tokens = args.iter().peekable();

    while let Some(token) = tokens.next() {
        if token == URL_FLAG {
            if let Some(value) = tokens.next_if(|next| is_flag_value(next)) {
                url = Some(value.clone());
            }
        } else if let Some(value) = token.strip_prefix("--url=") {
            if !value.is_empty() {
                url = Some(value.to_string());
            }
        }
    }

    url
}

pub fn has_skip_reporter(args: &[String]) -> bool {
    args.iter().any(|a| a == SKIP_REPORTER_FLAG)
}
