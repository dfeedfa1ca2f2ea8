// ABOUTME: Interactive prompts for host details and extra SSH options
// ABOUTME: Reads from any BufRead line source and writes questions to any Write sink

use crate::ssh::ExtraOptions;
use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

/// Line that ends extra option entry.
pub const DONE_SENTINEL: &str = "done";

/// Host fields collected from flags; `None` means "ask".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAnswers {
    pub name: Option<String>,
    pub address: Option<String>,
    pub user: Option<String>,
    pub identity_file: Option<String>,
}

/// Fully resolved host fields, identity file not yet tilde-expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDetails {
    pub name: String,
    pub address: String,
    pub user: String,
    pub identity_file: String,
}

/// Asks for every missing field. An empty identity file answer selects
/// `default_identity_file`.
pub fn complete_host_details(
    answers: HostAnswers,
    default_identity_file: &str,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<HostDetails> {
    let name = ask_if_missing(answers.name, "Enter the SSH host name: ", input, out)?;
    let address = ask_if_missing(answers.address, "Enter the IP address: ", input, out)?;
    let user = ask_if_missing(answers.user, "Enter the username: ", input, out)?;
    let identity_file = match answers.identity_file.filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => {
            let key = ask(
                "Enter the SSH key path (leave empty for default): ",
                input,
                out,
            )?;
            if key.is_empty() {
                default_identity_file.to_string()
            } else {
                key
            }
        }
    };

    Ok(HostDetails {
        name,
        address,
        user,
        identity_file,
    })
}

/// Reads `key=value` lines until `done` or end of input. Malformed lines are
/// reported and skipped.
pub fn read_extra_options(input: &mut dyn BufRead, out: &mut dyn Write) -> Result<ExtraOptions> {
    let mut options = ExtraOptions::new();
    writeln!(
        out,
        "Enter extra SSH arguments in format key=value, type '{DONE_SENTINEL}' to finish:"
    )?;

    loop {
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read extra arguments")?;
        if read == 0 {
            break;
        }

        let line = line.trim();
        if line == DONE_SENTINEL {
            break;
        }

        match ExtraOptions::parse_pair(line) {
            Some((key, value)) => options.insert(key, value),
            None => writeln!(out, "Invalid format. Please use key=value format.")?,
        }
    }

    Ok(options)
}

fn ask_if_missing(
    value: Option<String>,
    question: &str,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<String> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => Ok(v),
        None => ask(question, input, out),
    }
}

fn ask(question: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<String> {
    write!(out, "{question}")?;
    out.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read answer to '{}'", question.trim()))?;
    if read == 0 {
        bail!("Input ended before answering '{}'", question.trim());
    }
    Ok(line.trim().to_string())
}
