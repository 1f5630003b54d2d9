use std::io::{BufRead, Write};

use dosetup_schema::errors::ToErrorInfo;
use dosetup_schema::{DsResult, ErrorCode, ErrorInfoContext};

pub const TOKEN_PROMPT: &str = "DigitalOcean API Token: ";
pub const DOMAIN_PROMPT: &str = "Enter domain name: ";

/// Token from the flag or environment, else a hidden terminal prompt.
pub fn resolve_token(token: Option<String>) -> DsResult<String> {
    let token = match token.filter(|t| !t.trim().is_empty()) {
        Some(t) => t,
        None => rpassword::prompt_password(TOKEN_PROMPT)
            .error_msg(ErrorCode::MissingArguments, "Failed to read API token")?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return "Empty API token".to_error_code(ErrorCode::MissingArguments);
    }
    Ok(token)
}

/// Base domain from the flag, then config, then stdin.
pub fn resolve_domain(flag: Option<&String>, configured: Option<&String>) -> DsResult<String> {
    if let Some(d) = flag.or(configured) {
        return Ok(d.clone());
    }
    let stdin = std::io::stdin();
    read_domain(&mut stdin.lock(), &mut std::io::stderr())
}

pub fn read_domain<R: BufRead, W: Write>(input: &mut R, prompt_out: &mut W) -> DsResult<String> {
    write!(prompt_out, "{}", DOMAIN_PROMPT).error_info("Failed to write prompt")?;
    prompt_out.flush().error_info("Failed to flush prompt")?;
    let mut line = String::new();
    input.read_line(&mut line).error_info("Failed to read domain")?;
    let domain = line.trim().to_string();
    if domain.is_empty() {
        return "No domain name given".to_error_code(ErrorCode::MissingArguments);
    }
    Ok(domain)
}
