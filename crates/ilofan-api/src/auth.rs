use secrecy::SecretString;

/// Static credentials for one management controller.
///
/// The same triple authenticates both the Redfish API (HTTP Basic) and the
/// SSH command interface (password auth). `Debug` redacts the password.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Controller host name or address, optionally with `:port` for HTTPS.
    pub host: String,
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
        }
    }

    /// Host part without any `:port` suffix (SSH uses its own port).
    pub fn hostname(&self) -> &str {
        // Bracketed IPv6 literal: `[fe80::1]:443`
        if let Some(rest) = self.host.strip_prefix('[') {
            return rest.split(']').next().unwrap_or(rest);
        }
        match self.host.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => host,
            _ => &self.host,
        }
    }
}
