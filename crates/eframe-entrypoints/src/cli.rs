//! Command line parsing shared by native and web builds
//!
//! On web there is no argv, so the page URL stands in for it:
//! - `?cliline-width=3` becomes `--line-width 3`
//! - `?cliignore-persisted` becomes `--ignore-persisted`
//! - `?envLOG_LEVEL=debug` sets `LOG_LEVEL` for [`get_env`]

use clap::Parser;
use percent_encoding::percent_decode_str;
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
thread_local! {
    static ENV_MAP: std::cell::RefCell<HashMap<String, String>> = std::cell::RefCell::new(HashMap::new());
}

/// Arguments and environment extracted from a URL query string
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryArgs {
    /// Argument list without the program name
    pub args: Vec<String>,
    /// `(key, value)` pairs, value empty for bare keys
    pub env: Vec<(String, String)>,
}

/// Split a query string (with or without the leading `?`) into CLI args and env pairs
pub fn parse_query(query: &str) -> QueryArgs {
    let query = query.strip_prefix('?').unwrap_or(query);
    let query = query.split('#').next().unwrap_or_default();
    let mut out = QueryArgs::default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if let Some(arg_key) = key.strip_prefix("cli") {
            if !arg_key.is_empty() {
                out.args.push(format!("--{arg_key}"));
            }
            if !value.is_empty() {
                out.args.push(decode_component(value));
            }
        } else if let Some(env_key) = key.strip_prefix("env") {
            if !env_key.is_empty() {
                out.env.push((env_key.to_string(), decode_component(value)));
            }
        }
    }
    out
}

/// `application/x-www-form-urlencoded` decoding, invalid escapes stay literal
fn decode_component(value: &str) -> String {
    percent_decode_str(&value.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Generic function to get environment variable, parsing it to the desired type.
pub fn get_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    #[cfg(target_arch = "wasm32")]
    {
        ENV_MAP.with(|map| map.borrow().get(key).and_then(|s| s.parse().ok()))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var(key).ok().and_then(|s| s.parse().ok())
    }
}

#[cfg(target_arch = "wasm32")]
fn location_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Parses from the command line arguments on native and from GET parameters on web.
pub fn parse_args<T: Parser>() -> Result<T, clap::Error> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        T::try_parse()
    }
    #[cfg(target_arch = "wasm32")]
    {
        use clap::CommandFactory;

        let query = parse_query(&location_query());
        let bin_name = T::command().get_name().to_string();
        let args = std::iter::once(bin_name).chain(query.args);
        T::try_parse_from(args)
    }
}

/// Load environment overrides from GET parameters on web; no-op on native.
pub fn parse_env() {
    #[cfg(target_arch = "wasm32")]
    {
        let query = parse_query(&location_query());
        ENV_MAP.with(|map| map.borrow_mut().extend(query.env));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestArgs {
        #[arg(long)]
        line_width: Option<f32>,
        #[arg(long)]
        ignore_persisted: bool,
        #[arg(long)]
        kml_file: Option<String>,
    }

    #[test]
    fn test_parse_query_args_and_env() {
        let query = parse_query("?cliline-width=3.5&cliignore-persisted&envLOG_LEVEL=debug");

        assert_eq!(query.args, vec!["--line-width", "3.5", "--ignore-persisted"]);
        assert_eq!(
            query.env,
            vec![("LOG_LEVEL".to_string(), "debug".to_string())]
        );
    }

    #[test]
    fn test_parse_query_ignores_unknown_and_empty() {
        let query = parse_query("foo=bar&&cli=&env=x#fragment");
        assert_eq!(query, QueryArgs::default());
        assert_eq!(parse_query(""), QueryArgs::default());
    }

    #[test]
    fn test_parse_query_decodes_values() {
        let query = parse_query(
            "clikml-file=my%20tracks+2024.kml&envNAME=a%2Fb&envBAD=%zz&envSIGN=%+4",
        );
        assert_eq!(query.args, vec!["--kml-file", "my tracks 2024.kml"]);
        assert_eq!(query.env[0].1, "a/b");
        assert_eq!(query.env[1].1, "%zz");
        assert_eq!(query.env[2].1, "% 4");
    }

    #[test]
    fn test_decode_component_keeps_malformed_escapes() {
        assert_eq!(decode_component("%+4"), "% 4");
        assert_eq!(decode_component("%-1x"), "%-1x");
        assert_eq!(decode_component("50%"), "50%");
        assert_eq!(decode_component("caf%C3%A9"), "café");
    }

    #[test]
    fn test_query_args_feed_clap() {
        let query = parse_query("cliline-width=2&cliignore-persisted");
        let args = TestArgs::try_parse_from(std::iter::once("test".to_string()).chain(query.args))
            .unwrap();

        assert_eq!(args.line_width, Some(2.0));
        assert!(args.ignore_persisted);
        assert!(args.kml_file.is_none());
    }
}
