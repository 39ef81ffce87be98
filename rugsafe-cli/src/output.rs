//! Output formatting utilities for the rugsafe CLI

use colored::*;
use rugsafe_base::VaultRegistry;
use serde_json::{Value, json};

/// Format and print output based on the JSON flag
pub fn print_output(data: Value, json_format: bool) {
    if json_format {
        println!(
            "{}",
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_human_readable(&data);
    }
}

/// Print data in human-readable format
fn print_human_readable(data: &Value) {
    match data {
        Value::Object(map) => {
            for (key, value) in map {
                match key.as_str() {
                    "version" => print_version_info(value),
                    "health" => print_health_info(value),
                    "account_info" => print_account_info(value),
                    "balance" => print_balance_info(value),
                    "vaults" => print_vaults_info(value),
                    "transaction" => print_transaction_info(value),
                    "derived_address" => print_derived_address_info(value),
                    "keys" => print_keys_info(value),
                    _ => println!("{}: {}", key.cyan(), format_value(value)),
                }
            }
        }
        _ => println!("{}", format_value(data)),
    }
}

/// Format large numbers in a compact way, with underscores as thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::new();
    let chars = s.chars().rev().collect::<Vec<_>>();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(*c);
    }
    out.chars().rev().collect()
}

/// Format a JSON value for human-readable output
fn format_value(value: &Value) -> String {
    format_value_ext(value, false)
}

/// Format a JSON value for human-readable output
fn format_value_ext(value: &Value, thousand_separator: bool) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if thousand_separator {
                format_number(n.as_u64().unwrap_or(0))
            } else {
                n.to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!(
            "[{}]",
            arr.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Print version information
fn print_version_info(data: &Value) {
    if let Value::Object(version_data) = data {
        println!("{}", "Version Information".bold().green());

        if let Some(core) = version_data.get("solana-core") {
            println!("  {}: {}", "Node".cyan(), format_value(core));
        }

        if let Some(feature_set) = version_data.get("feature-set") {
            println!("  {}: {}", "Feature Set".cyan(), format_value(feature_set));
        }
    }
}

/// Print health information
fn print_health_info(data: &Value) {
    match data {
        Value::String(status) if status == "ok" => {
            println!("{}", "Node is healthy".bold().green());
        }
        other => {
            println!("{}", "Node is unhealthy".bold().red());
            println!("  {}: {}", "Reason".cyan(), format_value(other));
        }
    }
}

/// Print account information
fn print_account_info(data: &Value) {
    if let Value::Object(account_data) = data {
        println!("{}", "Account Information".bold().green());

        if let Some(pubkey) = account_data.get("pubkey") {
            println!("  {}: {}", "Public Key".cyan(), format_value(pubkey));
        }

        if let Some(lamports) = account_data.get("lamports") {
            println!(
                "  {}: {}",
                "Lamports".cyan(),
                format_value_ext(lamports, true)
            );
        }

        if let Some(owner) = account_data.get("owner") {
            println!("  {}: {}", "Owner".cyan(), format_value(owner));
        }

        if let Some(data_size) = account_data.get("dataSize") {
            println!("  {}: {}", "Data Size".cyan(), format_value(data_size));
        }

        if let Some(executable) = account_data.get("executable") {
            let is_program = executable.as_bool().unwrap_or(false);
            println!(
                "  {}: {}",
                "Is Program".cyan(),
                if is_program {
                    "Yes".green()
                } else {
                    "No".red()
                }
            );
        }
    }
}

/// Print balance information
fn print_balance_info(data: &Value) {
    if let Value::Object(balance_data) = data {
        if let Some(pubkey) = balance_data.get("pubkey") {
            println!("{}: {}", "Account".cyan(), format_value(pubkey));
        }

        if let Some(balance) = balance_data.get("balance") {
            println!(
                "{}: {}",
                "Balance".bold().green(),
                format_value_ext(balance, true)
            );
        }
    }
}

/// Print the vault registry
fn print_vaults_info(data: &Value) {
    let Value::Object(vaults_data) = data else {
        return;
    };

    if let Some(registry) = vaults_data.get("registry") {
        println!("{}: {}", "Registry".cyan(), format_value(registry));
    }

    let entries = vaults_data
        .get("list")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if entries.is_empty() {
        println!("{}", "No vaults registered".yellow());
        return;
    }

    println!("{} ({})", "Vaults".bold().green(), entries.len());
    for (index, vault) in entries.iter().enumerate() {
        println!("  {} {}", "#".dimmed(), index.to_string().bold());
        for (field, label) in [
            ("vault_account", "Vault Account"),
            ("mint_token_a", "Token-A Mint"),
            ("mint_a_token_a", "Receipt Mint"),
            ("owner", "Owner"),
        ] {
            if let Some(value) = vault.get(field) {
                println!("    {}: {}", label.cyan(), format_value(value));
            }
        }
    }
}

/// Print a submitted transaction
fn print_transaction_info(data: &Value) {
    if let Value::Object(txn_data) = data {
        if let Some(operation) = txn_data.get("operation") {
            println!(
                "{}",
                format!("Transaction: {}", format_value(operation))
                    .bold()
                    .green()
            );
        }

        for (field, label) in [
            ("vault", "Vault"),
            ("token_a_mint", "Token-A Mint"),
            ("receipt_mint", "Receipt Mint"),
            ("amount", "Amount"),
            ("signer", "Signer"),
            ("signature", "Signature"),
        ] {
            if let Some(value) = txn_data.get(field) {
                println!("  {}: {}", label.cyan(), format_value(value));
            }
        }

        if let Some(status) = txn_data.get("status") {
            let status_str = format_value(status);
            let colored_status = match status_str.as_str() {
                "confirmed" => status_str.green(),
                "submitted" => status_str.yellow(),
                _ => status_str.normal(),
            };
            println!("  {}: {}", "Status".cyan(), colored_status);
        }
    }
}

/// Print a derived address
fn print_derived_address_info(data: &Value) {
    if let Value::Object(derived) = data {
        if let Some(kind) = derived.get("kind") {
            println!("{}", format_value(kind).bold().green());
        }
        if let Some(address) = derived.get("address") {
            println!("  {}: {}", "Address".cyan(), format_value(address));
        }
        if let Some(bump) = derived.get("bump") {
            println!("  {}: {}", "Bump".cyan(), format_value(bump));
        }
    }
}

/// Print keys information
fn print_keys_info(data: &Value) {
    let Value::Object(keys_data) = data else {
        return;
    };

    if let Some(Value::Array(key_names)) = keys_data.get("list") {
        println!("{}", "Available Keys".bold().green());
        for key_name in key_names {
            println!("  {}", format_value(key_name));
        }
    }

    if let (Some(operation), Some(name)) = (keys_data.get("operation"), keys_data.get("name")) {
        let op_str = format_value(operation);
        let name_str = format_value(name);

        match op_str.as_str() {
            "add" => println!(
                "{}: Key '{}' added to configuration",
                "Success".bold().green(),
                name_str
            ),
            "get" => {
                if let Some(value) = keys_data.get("value") {
                    println!("Key '{}': {}", name_str.cyan(), format_value(value));
                }
            }
            "generate" => {
                if let Some(value) = keys_data.get("value") {
                    println!(
                        "Generated key '{}': {}",
                        name_str.cyan(),
                        format_value(value)
                    );
                }
                println!(
                    "{}: Key '{}' added to configuration",
                    "Success".bold().green(),
                    name_str
                );
            }
            "remove" => println!(
                "{}: Key '{}' removed from configuration",
                "Success".bold().green(),
                name_str
            ),
            _ => println!(
                "{}: Operation '{}' on key '{}'",
                "Info".bold().blue(),
                op_str,
                name_str
            ),
        }
    }
}

/// Print error message
pub fn print_error(error: &str) {
    eprintln!("{}: {}", "Error".bold().red(), error);
}

/// Print warning message
pub fn print_warning(warning: &str) {
    eprintln!("{}: {}", "Warning".bold().yellow(), warning);
}

/// Create a JSON response for version information
pub fn create_version_response(core: &str, feature_set: Option<u32>) -> Value {
    json!({
        "version": {
            "solana-core": core,
            "feature-set": feature_set
        }
    })
}

/// Create a JSON response for health information
pub fn create_health_response(status: &str) -> Value {
    json!({
        "health": status
    })
}

/// Create a JSON response for account information
pub fn create_account_info_response(account_data: Value) -> Value {
    json!({
        "account_info": account_data
    })
}

/// Create a JSON response for balance information
pub fn create_balance_response(pubkey: &str, balance: u64) -> Value {
    json!({
        "balance": {
            "pubkey": pubkey,
            "balance": balance
        }
    })
}

/// Create a JSON response listing the registry contents
pub fn create_vaults_response(registry_address: &str, registry: &VaultRegistry) -> Value {
    json!({
        "vaults": {
            "registry": registry_address,
            "count": registry.count(),
            "list": registry.vaults
        }
    })
}

/// Create a JSON response for a submitted transaction.
///
/// `details` holds operation-specific fields such as the vault or amount.
pub fn create_transaction_response(
    operation: &str,
    signer: &str,
    signature: &str,
    status: &str,
    details: Value,
) -> Value {
    let mut response = json!({
        "transaction": {
            "operation": operation,
            "signer": signer,
            "signature": signature,
            "status": status
        }
    });

    if let (Some(obj), Value::Object(extra)) = (response["transaction"].as_object_mut(), details)
    {
        obj.extend(extra);
    }

    response
}

/// Create a JSON response for a derived address
pub fn create_derived_address_response(kind: &str, address: &str, bump: Option<u8>) -> Value {
    let mut response = json!({
        "derived_address": {
            "kind": kind,
            "address": address
        }
    });

    if let Some(bump) = bump {
        response["derived_address"]["bump"] = json!(bump);
    }

    response
}

/// Create a JSON response for keys list
pub fn create_keys_list_response(key_names: Vec<String>) -> Value {
    json!({
        "keys": {
            "list": key_names
        }
    })
}

/// Create a JSON response for keys operations
pub fn create_keys_operation_response(
    operation: &str,
    name: &str,
    status: &str,
    value: Option<&str>,
) -> Value {
    let mut response = json!({
        "keys": {
            "operation": operation,
            "name": name,
            "status": status
        }
    });

    if let Some(key_value) = value {
        response["keys"]["value"] = json!(key_value);
    }

    response
}
