use crate::cli::args::{CliArgs, Command};

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive number of seconds".to_string());
        }
    }
    if let Some(raw) = args.endpoint.as_deref() {
        reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid --endpoint '{raw}': {e}"))?;
    }
    if let Command::List { format } = &args.command {
        crate::output::OutputFormat::parse(format)
            .ok_or_else(|| format!("invalid --format '{format}', expected text or json"))?;
    }
    Ok(())
}
