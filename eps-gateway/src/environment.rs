const SANDBOX_BASE_URL: &str = "https://sandbox-pgapi.eps.com.bd";
const PRODUCTION_BASE_URL: &str = "https://pgapi.eps.com.bd";

const TOKEN_PATH: &str = "/v1/Auth/GetToken";
const INITIALIZE_PATH: &str = "/v1/EPSEngine/InitializeEPS";
const VERIFY_PATH: &str = "/v1/EPSEngine/CheckMerchantTransactionStatus";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }
}

/// The three gateway URLs a client talks to. Fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token: String,
    pub initialize: String,
    pub verify: String,
}

impl Endpoints {
    pub fn for_environment(environment: Environment) -> Self {
        Self::with_base_url(environment.base_url())
    }

    /// Same paths on another host, e.g. a local mock of the gateway.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            token: format!("{base}{TOKEN_PATH}"),
            initialize: format!("{base}{INITIALIZE_PATH}"),
            verify: format!("{base}{VERIFY_PATH}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_endpoints() {
        let endpoints = Endpoints::for_environment(Environment::Sandbox);
        assert_eq!(
            endpoints.token,
            "https://sandbox-pgapi.eps.com.bd/v1/Auth/GetToken"
        );
        assert_eq!(
            endpoints.initialize,
            "https://sandbox-pgapi.eps.com.bd/v1/EPSEngine/InitializeEPS"
        );
        assert_eq!(
            endpoints.verify,
            "https://sandbox-pgapi.eps.com.bd/v1/EPSEngine/CheckMerchantTransactionStatus"
        );
    }

    #[test]
    fn production_differs_only_by_host() {
        let endpoints = Endpoints::for_environment(Environment::Production);
        assert_eq!(endpoints.token, "https://pgapi.eps.com.bd/v1/Auth/GetToken");
        assert!(endpoints.verify.starts_with("https://pgapi.eps.com.bd/"));
    }

    #[test]
    fn custom_base_url_trims_trailing_slash() {
        let endpoints = Endpoints::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(endpoints.token, "http://127.0.0.1:9000/v1/Auth/GetToken");
    }
}
