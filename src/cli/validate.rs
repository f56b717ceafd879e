use crate::cli::commands::ValidateArgs;
use crate::config::{parse_config, ScannerOverrides, ServerOverrides};
use crate::errors::SmugglerError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), SmugglerError> {
    let config = parse_config(&args.config).await?;
    let scanner = config.scanner_config(&ScannerOverrides::default());
    let server = config.server_config(&ServerOverrides::default());

    println!("Configuration is valid: {}", args.config.display());
    println!("  python_bin:    {}", scanner.python_bin.display());
    println!("  smuggler_path: {}", scanner.smuggler_path.display());
    match scanner.max_duration {
        Some(limit) => println!("  max_duration:  {}s", limit.as_secs()),
        None => println!("  max_duration:  unlimited"),
    }
    println!("  listen:        {}", server.bind_addr());
    Ok(())
}
