use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

use log::{info, warn};

use crate::optimizer::SearchConfig;
use crate::strategy::PlacementStrategy;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub optimizer: OptimizerConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self::from_source(&env_string)
    }

    /// Creates a configuration from an arbitrary variable lookup.
    pub fn from_source(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            api: ApiConfig::from_source(lookup),
            optimizer: OptimizerConfig::from_source(lookup),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const HOST_VAR: &'static str = "BINSTACK_API_HOST";
    const PORT_VAR: &'static str = "BINSTACK_API_PORT";
    const DEFAULT_BIND_IP: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_source(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let host_value = lookup(Self::HOST_VAR).unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                warn!(
                    "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (Self::DEFAULT_BIND_IP, Self::DEFAULT_HOST.to_string())
            }
        };

        let port = load_with_warning(
            lookup,
            Self::PORT_VAR,
            Self::DEFAULT_PORT,
            |value| value != 0,
            "must not be 0",
        );

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Defaults of the order search and the packing runs behind it.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    search: SearchConfig,
    seed: Option<u64>,
    verify_solutions: bool,
}

impl OptimizerConfig {
    const STRATEGY_VAR: &'static str = "BINSTACK_STRATEGY";
    const ITERATIONS_VAR: &'static str = "BINSTACK_ANNEALING_ITERATIONS";
    const SEED_VAR: &'static str = "BINSTACK_RANDOM_SEED";
    const BRUTE_FORCE_LIMIT_VAR: &'static str = "BINSTACK_BRUTE_FORCE_LIMIT";
    const VERIFY_VAR: &'static str = "BINSTACK_VERIFY_SOLUTIONS";

    /// Above this, brute force runs into millions of packing runs.
    const MAX_BRUTE_FORCE_LIMIT: usize = 10;

    /// Largest annealing budget accepted from the environment or a request.
    pub const MAX_ITERATIONS: usize = 100_000;

    fn from_source(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let strategy = match lookup(Self::STRATEGY_VAR) {
            Some(raw) => raw.parse::<PlacementStrategy>().unwrap_or_else(|err| {
                warn!(
                    "⚠️ {}: {}. Using {}.",
                    Self::STRATEGY_VAR,
                    err,
                    PlacementStrategy::default()
                );
                PlacementStrategy::default()
            }),
            None => PlacementStrategy::default(),
        };

        let iterations = load_with_warning(
            lookup,
            Self::ITERATIONS_VAR,
            SearchConfig::DEFAULT_ITERATIONS,
            |value| (1..=Self::MAX_ITERATIONS).contains(&value),
            "must be between 1 and 100000",
        );

        let brute_force_limit = load_with_warning(
            lookup,
            Self::BRUTE_FORCE_LIMIT_VAR,
            SearchConfig::DEFAULT_BRUTE_FORCE_LIMIT,
            |value| value <= Self::MAX_BRUTE_FORCE_LIMIT,
            "must be at most 10",
        );

        let seed = lookup(Self::SEED_VAR).and_then(|raw| match raw.parse::<u64>() {
            Ok(seed) => {
                info!("🎲 Using fixed random seed {} ({}).", seed, Self::SEED_VAR);
                Some(seed)
            }
            Err(err) => {
                warn!(
                    "⚠️ Could not parse {} ('{}'): {}. Seeding from entropy.",
                    Self::SEED_VAR,
                    raw,
                    err
                );
                None
            }
        });

        let verify_solutions = lookup(Self::VERIFY_VAR)
            .and_then(|raw| parse_bool(&raw, Self::VERIFY_VAR))
            .unwrap_or(false);

        let search = SearchConfig::builder()
            .strategy(strategy)
            .iterations(iterations)
            .brute_force_limit(brute_force_limit)
            .build();

        Self {
            search,
            seed,
            verify_solutions,
        }
    }

    /// Returns the configured SearchConfig.
    pub fn search_config(&self) -> SearchConfig {
        self.search
    }

    /// Fixed seed for the random generator, if configured.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Whether every result is checked before it is returned.
    pub fn verify_solutions(&self) -> bool {
        self.verify_solutions
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            seed: None,
            verify_solutions: false,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            warn!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn load_with_warning<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    var_name: &str,
    default: T,
    validator: impl Fn(T) -> bool,
    invalid_hint: &str,
) -> T
where
    T: FromStr + Copy + PartialEq + Display,
    T::Err: Display,
{
    match lookup(var_name) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) if validator(value) => {
                if value != default {
                    info!("⚙️ {} = {} (default {}).", var_name, value, default);
                }
                value
            }
            Ok(_) => {
                warn!(
                    "⚠️ {} contains invalid value '{}': {}. Using {}.",
                    var_name, raw, invalid_hint, default
                );
                default
            }
            Err(err) => {
                warn!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}
