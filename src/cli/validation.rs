//! Value parsers for CLI arguments.

use std::fs;
use std::net::Ipv4Addr;
use std::path::PathBuf;

pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535, got: '{port_str}'"))?;
    if port == 0 {
        return Err("Port 0 is not allowed".to_string());
    }
    Ok(port)
}

/// The file must exist and be readable.
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);
    if !path.is_file() {
        return Err(format!("Configuration file does not exist: '{path_str}'"));
    }
    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{path_str}': {e}"))
}

pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();
    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }
    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }
    // Dotted digits must form a real IPv4 address; anything else is a hostname.
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') && host.parse::<Ipv4Addr>().is_err() {
        return Err(format!("Invalid IPv4 address: '{host_str}'"));
    }
    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        for port in ["1", "80", "3000", "65535"] {
            assert!(validate_port(port).is_ok(), "{port} should be valid");
        }
        for port in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port).is_err(), "{port} should be invalid");
        }
    }

    #[test]
    fn test_host_validation() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "pizza-db.local"] {
            assert!(validate_host_address(host).is_ok(), "{host} should be valid");
        }
        let long = "x".repeat(300);
        for host in ["", "   ", "with space", "999.1.1.1", long.as_str()] {
            assert!(validate_host_address(host).is_err(), "'{host}' should be invalid");
        }
    }

    #[test]
    fn test_config_file_must_exist() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());

        let file = dir.path().join("service.toml");
        fs::write(&file, "").unwrap();
        assert_eq!(validate_config_file_path(file.to_str().unwrap()).unwrap(), file);
    }
}
