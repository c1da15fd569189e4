use anyhow::Result;

/// Run the version command.
///
/// # Errors
///
/// Never fails; the `Result` keeps the dispatch table uniform.
pub fn run() -> Result<()> {
    let version = option_env!("RICEBOX_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    println!("ricebox {version}");
    Ok(())
}
