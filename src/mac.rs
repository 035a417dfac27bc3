/// Parses an environment variable into a `Lazy` static, falling back to a
/// default when the variable is absent or fails to parse. Mirrors the
/// pattern used throughout `cnf` for every tunable that a deployment might
/// want to override without a config file.
macro_rules! lazy_env_parse {
	($key:expr, $t:ty, $default:expr) => {
		once_cell::sync::Lazy::new(|| match std::env::var($key) {
			Ok(v) => v.parse::<$t>().unwrap_or_else(|_| {
				tracing::warn!("invalid value for {} - using default", $key);
				$default
			}),
			Err(_) => $default,
		})
	};
}

pub(crate) use lazy_env_parse;
