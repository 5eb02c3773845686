// Headless mode: run a reveal on plain stdout
//
// Usage: price-reveal reveal <price> [JPY|USD]

use anyhow::{bail, Context, Result};
use price_reveal::{Animator, Currency, Price, RevealConfig, RevealRequest};
use std::io::{self, Write};
use std::thread;
use std::time::Instant;

pub fn parse_request(args: &[String], config: &RevealConfig) -> Result<RevealRequest> {
    let Some(raw_price) = args.first() else {
        bail!("usage: price-reveal reveal <price> [JPY|USD]");
    };

    let price = Price::parse(raw_price).context("Invalid price")?;
    let currency = match args.get(1) {
        Some(code) => code.parse::<Currency>()?,
        None => config.default_currency,
    };

    Ok(RevealRequest::new(price, currency))
}

pub fn run_reveal(args: &[String], config: &RevealConfig) -> Result<()> {
    let request = parse_request(args, config)?;
    let mut animator = Animator::new(config.timing)?;
    animator.start(request)?;

    drive(&mut animator, &mut io::stdout())
}

/// Redraw one line until the reveal completes, then print the result.
pub fn drive<W: Write>(animator: &mut Animator, out: &mut W) -> Result<()> {
    let tick = animator.timing().roll_interval();
    let mut last = Instant::now();

    while animator.is_running() {
        write!(out, "\r{}", animator.rendered())?;
        out.flush()?;

        thread::sleep(tick);
        let now = Instant::now();
        animator.advance(now - last);
        last = now;
    }

    // Clear the wider rolling template before printing the result
    writeln!(out, "\r{:width$}\r{}", "", animator.rendered(), width = 16)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_reveal::TimingConfig;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_request_with_currency() {
        let config = RevealConfig::default();
        let request = parse_request(&args(&["1234", "usd"]), &config).unwrap();
        assert_eq!(request.price.digits(), "1234");
        assert_eq!(request.currency, Currency::Usd);
        assert_eq!(request.expected_display(), "$1,234");
    }

    #[test]
    fn test_parse_request_default_currency() {
        let config = RevealConfig::default();
        let request = parse_request(&args(&["500"]), &config).unwrap();
        assert_eq!(request.currency, Currency::Jpy);
    }

    #[test]
    fn test_parse_request_errors() {
        let config = RevealConfig::default();
        assert!(parse_request(&[], &config).is_err());
        assert!(parse_request(&args(&["abc"]), &config).is_err());
        assert!(parse_request(&args(&["100", "EUR"]), &config).is_err());
    }

    #[test]
    fn test_drive_prints_final_display() {
        let timing = TimingConfig {
            roll_interval_ms: 1,
            fast_roll_ms: 2,
            settle_ms: 3,
        };
        let config = RevealConfig::default();
        let mut animator = Animator::with_seed(timing, 12).unwrap();
        animator
            .start(parse_request(&args(&["1234", "JPY"]), &config).unwrap())
            .unwrap();

        let mut out = Vec::new();
        drive(&mut animator, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let last_line = text.trim_end().rsplit('\r').next().unwrap();
        assert_eq!(last_line, "¥1,234");
        assert!(!animator.is_running());
    }
}
