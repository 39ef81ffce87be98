//! Key management command implementations

use anyhow::Result;

use crate::cli::KeysCommands;
use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Handle keys subcommands
pub async fn handle_keys_command(
    config: &mut Config,
    subcommand: KeysCommands,
    json_format: bool,
) -> Result<(), CliError> {
    match subcommand {
        KeysCommands::List => list_keys(config, json_format),
        KeysCommands::Add {
            overwrite,
            name,
            key,
        } => add_key(config, &name, &key, overwrite, json_format).await,
        KeysCommands::Get { name } => get_key(config, &name, json_format),
        KeysCommands::Generate { name } => generate_key(config, &name, json_format).await,
        KeysCommands::Remove { name } => remove_key(config, &name, json_format).await,
    }
}

/// List all keys in the configuration
fn list_keys(config: &Config, json_format: bool) -> Result<(), CliError> {
    let response = output::create_keys_list_response(config.keys.list_keys());
    output::print_output(response, json_format);
    Ok(())
}

/// Add a new key to the configuration
async fn add_key(
    config: &mut Config,
    name: &str,
    key: &str,
    overwrite: bool,
    json_format: bool,
) -> Result<(), CliError> {
    config.keys.add_key(name, key, overwrite)?;
    config.save().await?;

    let response = output::create_keys_operation_response("add", name, "success", None);
    output::print_output(response, json_format);
    Ok(())
}

/// Get a key value from the configuration
fn get_key(config: &Config, name: &str, json_format: bool) -> Result<(), CliError> {
    let key_value = config.keys.get_key(name)?;

    let response = output::create_keys_operation_response("get", name, "success", Some(key_value));
    output::print_output(response, json_format);
    Ok(())
}

/// Generate a new random key and add it to the configuration
async fn generate_key(config: &mut Config, name: &str, json_format: bool) -> Result<(), CliError> {
    let generated_key = config.keys.generate_key(name, false)?;
    config.save().await?;

    let response =
        output::create_keys_operation_response("generate", name, "success", Some(&generated_key));
    output::print_output(response, json_format);
    Ok(())
}

/// Remove a key from the configuration
async fn remove_key(config: &mut Config, name: &str, json_format: bool) -> Result<(), CliError> {
    if name.eq_ignore_ascii_case("default") && !json_format {
        output::print_warning("Removing 'default' key leaves the CLI without a fallback signer");
    }

    config.keys.remove_key(name)?;
    config.save().await?;

    let response = output::create_keys_operation_response("remove", name, "success", None);
    output::print_output(response, json_format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_keys() {
        let config = Config::default();
        assert!(list_keys(&config, true).is_ok());
    }

    #[test]
    fn test_get_key() {
        let config = Config::default();
        assert!(get_key(&config, "default", true).is_ok());
    }

    #[test]
    fn test_get_nonexistent_key() {
        let config = Config::default();
        assert!(get_key(&config, "nonexistent", true).is_err());
    }
}
