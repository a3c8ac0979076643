use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // HTTP API
    pub listen_addr: String,
    pub debug: bool,

    // Pipeline tunables
    pub max_concurrent: usize,
    pub geocode_attempts: u32,
    pub retry_delay_secs: u64,
    pub lookup_timeout_secs: u64,
    pub http_timeout_secs: u64,

    // Geocoding backends, in fallback order
    pub geocoders: Vec<String>,
    pub bing_url: String,
    pub bing_key: Option<String>,
    pub nominatim_url: String,
    pub user_agent: String,

    // Boundary service
    pub boundary_url: String,
    pub boundary_api_key: Option<String>,

    // Entity recognition
    pub ner_url: Option<String>,
    pub gazetteer_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            debug: false,
            max_concurrent: 5,
            geocode_attempts: 3,
            retry_delay_secs: 2,
            lookup_timeout_secs: 30,
            http_timeout_secs: 10,
            geocoders: vec!["bing".to_string(), "nominatim".to_string()],
            bing_url: "http://dev.virtualearth.net".to_string(),
            bing_key: None,
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "city-extractor".to_string(),
            boundary_url: "https://geocode.maps.co".to_string(),
            boundary_api_key: None,
            ner_url: None,
            gazetteer_path: None,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Build the config from an arbitrary variable lookup. Unparseable numbers
/// fall back to their defaults; empty optional values count as unset.
pub fn load_config_from<F>(var: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let optional = |key: &str| var(key).filter(|v| !v.trim().is_empty());

    let listen_addr = var("GEORESOLVE_LISTEN_ADDR").unwrap_or(defaults.listen_addr);

    let debug = var("DEBUG").is_some();

    let max_concurrent = var("GEORESOLVE_MAX_CONCURRENT")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(defaults.max_concurrent);

    let geocode_attempts = var("GEORESOLVE_GEOCODE_ATTEMPTS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(defaults.geocode_attempts);

    let retry_delay_secs = var("GEORESOLVE_RETRY_DELAY_SECS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(defaults.retry_delay_secs);

    let lookup_timeout_secs = var("GEORESOLVE_LOOKUP_TIMEOUT_SECS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(defaults.lookup_timeout_secs);

    let http_timeout_secs = var("GEORESOLVE_HTTP_TIMEOUT_SECS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(defaults.http_timeout_secs);

    let geocoders = var("GEORESOLVE_GEOCODERS")
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or(defaults.geocoders);

    let bing_url = var("GEORESOLVE_BING_URL").unwrap_or(defaults.bing_url);
    let bing_key = optional("GEORESOLVE_BING_KEY");

    let nominatim_url = var("GEORESOLVE_NOMINATIM_URL").unwrap_or(defaults.nominatim_url);
    let user_agent = var("GEORESOLVE_USER_AGENT").unwrap_or(defaults.user_agent);

    let boundary_url = var("GEORESOLVE_BOUNDARY_URL").unwrap_or(defaults.boundary_url);
    let boundary_api_key = optional("GEORESOLVE_BOUNDARY_API_KEY");

    let ner_url = optional("GEORESOLVE_NER_URL");
    let gazetteer_path = optional("GEORESOLVE_GAZETTEER_PATH");

    if let Some(unknown) = geocoders
        .iter()
        .find(|g: &&String| !matches!(g.as_str(), "bing" | "nominatim"))
    {
        anyhow::bail!("unknown geocoder {:?} in GEORESOLVE_GEOCODERS", unknown);
    }

    Ok(Config {
        listen_addr,
        debug,
        max_concurrent,
        geocode_attempts,
        retry_delay_secs,
        lookup_timeout_secs,
        http_timeout_secs,
        geocoders,
        bing_url,
        bing_key,
        nominatim_url,
        user_agent,
        boundary_url,
        boundary_api_key,
        ner_url,
        gazetteer_path,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_from(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8000");
        assert_eq!(cfg.max_concurrent, 5);
        assert_eq!(cfg.geocoders, vec!["bing", "nominatim"]);
        assert!(cfg.ner_url.is_none());
    }

    #[test]
    fn test_load_config_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8000");
        assert_eq!(cfg.geocode_attempts, 3);
        assert_eq!(cfg.retry_delay_secs, 2);
        assert_eq!(cfg.lookup_timeout_secs, 30);
        assert_eq!(cfg.http_timeout_secs, 10);
        assert_eq!(cfg.user_agent, "city-extractor");
        assert_eq!(cfg.boundary_url, "https://geocode.maps.co");
        assert!(!cfg.debug);
    }

    #[test]
    fn test_load_config_with_custom_listen_addr() {
        let cfg = load(&[("GEORESOLVE_LISTEN_ADDR", "127.0.0.1:9000")]).unwrap();
        assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_load_config_with_tunables() {
        let cfg = load(&[
            ("GEORESOLVE_MAX_CONCURRENT", "8"),
            ("GEORESOLVE_GEOCODE_ATTEMPTS", "5"),
            ("GEORESOLVE_RETRY_DELAY_SECS", "1"),
            ("GEORESOLVE_LOOKUP_TIMEOUT_SECS", "60"),
            ("GEORESOLVE_HTTP_TIMEOUT_SECS", " 4 "),
        ])
        .unwrap();
        assert_eq!(cfg.max_concurrent, 8);
        assert_eq!(cfg.geocode_attempts, 5);
        assert_eq!(cfg.retry_delay_secs, 1);
        assert_eq!(cfg.lookup_timeout_secs, 60);
        assert_eq!(cfg.http_timeout_secs, 4);
    }

    #[test]
    fn test_load_config_parse_error_uses_default() {
        let cfg = load(&[("GEORESOLVE_MAX_CONCURRENT", "lots")]).unwrap();
        assert_eq!(cfg.max_concurrent, 5);
    }

    #[test]
    fn test_load_config_geocoder_list() {
        let cfg = load(&[("GEORESOLVE_GEOCODERS", " Nominatim , ,bing")]).unwrap();
        assert_eq!(cfg.geocoders, vec!["nominatim", "bing"]);
    }

    #[test]
    fn test_load_config_unknown_geocoder_rejected() {
        let err = load(&[("GEORESOLVE_GEOCODERS", "nominatim,google")]).unwrap_err();
        assert!(err.to_string().contains("google"));
    }

    #[test]
    fn test_load_config_empty_optionals_are_unset() {
        let cfg = load(&[
            ("GEORESOLVE_BING_KEY", ""),
            ("GEORESOLVE_NER_URL", "  "),
        ])
        .unwrap();
        assert!(cfg.bing_key.is_none());
        assert!(cfg.ner_url.is_none());
    }

    #[test]
    fn test_load_config_with_providers() {
        let cfg = load(&[
            ("GEORESOLVE_BING_KEY", "secret"),
            ("GEORESOLVE_NOMINATIM_URL", "http://localhost:7070"),
            ("GEORESOLVE_BOUNDARY_API_KEY", "maps"),
            ("GEORESOLVE_NER_URL", "http://localhost:5000/ner"),
            ("GEORESOLVE_GAZETTEER_PATH", "/etc/places.tsv"),
        ])
        .unwrap();
        assert_eq!(cfg.bing_key.as_deref(), Some("secret"));
        assert_eq!(cfg.nominatim_url, "http://localhost:7070");
        assert_eq!(cfg.boundary_api_key.as_deref(), Some("maps"));
        assert_eq!(cfg.ner_url.as_deref(), Some("http://localhost:5000/ner"));
        assert_eq!(cfg.gazetteer_path.as_deref(), Some("/etc/places.tsv"));
    }

    #[test]
    fn test_load_config_with_debug() {
        let cfg = load(&[("DEBUG", "1")]).unwrap();
        assert!(cfg.debug);
    }

    #[test]
    fn test_load_config_reads_process_env() {
        std::env::set_var("GEORESOLVE_USER_AGENT", "geo-resolve-test");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.user_agent, "geo-resolve-test");
        std::env::remove_var("GEORESOLVE_USER_AGENT");
    }

    #[test]
    fn test_config_debug() {
        let cfg = Config::default();
        let debug_str = format!("{:?}", cfg);
        assert!(debug_str.contains("listen_addr"));
        assert!(debug_str.contains("0.0.0.0:8000"));
    }
}
