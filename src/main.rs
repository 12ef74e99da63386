//! Permalink resolver CLI.
//!
//! Loads a rewrite configuration and resolves request URLs against it.
//!
//! ```text
//! permalink-resolver --config resolver.toml resolve /about/ /feed/atom/
//! permalink-resolver explain /2024/05/hello-world/ --var paged=2
//! permalink-resolver check
//! permalink-resolver watch /about/          (re-resolves on every config change)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use url::form_urlencoded;

use permalink_resolver::config::{load_config, ConfigWatcher};
use permalink_resolver::observability::logging::init_logging;
use permalink_resolver::{QueryMap, QueryValue, ResolutionSession, ResolverHost};

#[derive(Parser)]
#[command(name = "permalink-resolver")]
#[command(about = "Resolve request URLs into query variables", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "resolver.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more URLs and print the query variables
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Extra variable as key=value (key[]=value appends to a list)
        #[arg(long = "var")]
        vars: Vec<String>,
        /// Extra variables as a JSON object, applied before --var
        #[arg(long = "vars-json")]
        vars_json: Option<String>,
    },
    /// Show the matched rule and intermediate results for a URL
    Explain {
        url: String,
        #[arg(long = "var")]
        vars: Vec<String>,
        #[arg(long = "vars-json")]
        vars_json: Option<String>,
    },
    /// Validate the configuration file and list its rules
    Check,
    /// Resolve URLs again every time the configuration file changes
    Watch {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_logging(&config.observability);

    let host = ResolverHost::from_config(&config)?;

    match cli.command {
        Commands::Resolve { urls, vars, vars_json } => {
            let extra = extra_vars(vars_json.as_deref(), &vars)?;
            let mut session = host.session();
            for url in &urls {
                print_json(&resolve_json(&mut session, url, &extra))?;
            }
        }
        Commands::Explain { url, vars, vars_json } => {
            let extra = extra_vars(vars_json.as_deref(), &vars)?;
            let mut session = host.session();
            print_json(&explain_json(&mut session, &url, &extra))?;
        }
        Commands::Check => {
            let snapshot = host.snapshot();
            println!(
                "{}: ok ({} rules, {} public query vars)",
                cli.config.display(),
                snapshot.rules().len(),
                snapshot.registry().public_vars().len()
            );
            for (index, rule) in snapshot.rules().rules().enumerate() {
                let marker = if rule.is_root() { " (root)" } else { "" };
                println!("{index:>4}  {} => {}{marker}", rule.pattern, rule.template);
            }
        }
        Commands::Watch { urls } => {
            let extra = QueryMap::new();
            let print_all = |host: &ResolverHost| -> Result<(), serde_json::Error> {
                let mut session = host.session();
                for url in &urls {
                    print_json(&resolve_json(&mut session, url, &extra))?;
                }
                Ok(())
            };
            print_all(&host)?;

            let (watcher, mut updates) = ConfigWatcher::new(&cli.config);
            let _watcher = watcher.run()?;

            loop {
                tokio::select! {
                    Some(config) = updates.recv() => {
                        match host.apply_config(&config) {
                            Ok(()) => print_all(&host)?,
                            Err(e) => tracing::error!(error = %e, "Rejected reloaded rule table"),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutting down watcher");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn extra_vars(
    json: Option<&str>,
    vars: &[String],
) -> Result<QueryMap, Box<dyn std::error::Error>> {
    let mut map = match json {
        Some(json) => {
            let value: Value = serde_json::from_str(json)?;
            if !value.is_object() {
                return Err("--vars-json must be a JSON object".into());
            }
            QueryValue::map_from_json(&value)
        }
        None => QueryMap::new(),
    };
    map.extend(parse_vars(vars)?);
    Ok(map)
}

/// Decode `--var key=value` arguments with query-string rules.
///
/// Keys and values are taken literally, so `+` and `%` in an argument are
/// not decoded.
fn parse_vars(vars: &[String]) -> Result<QueryMap, String> {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for var in vars {
        let (key, value) = var
            .split_once('=')
            .ok_or_else(|| format!("invalid --var `{var}`, expected key=value"))?;
        query.append_pair(key, value);
    }
    Ok(QueryValue::parse_query(&query.finish()))
}

fn resolve_json(session: &mut ResolutionSession, url: &str, extra: &QueryMap) -> Value {
    match session.resolve_url(url, extra) {
        Ok(vars) => json!({ "url": url, "vars": vars }),
        Err(e) => json!({ "url": url, "error": e.code(), "message": e.to_string() }),
    }
}

fn explain_json(session: &mut ResolutionSession, url: &str, extra: &QueryMap) -> Value {
    let outcome = resolve_json(session, url, extra);
    let Some(record) = session.record(url, extra) else {
        return outcome;
    };
    if !record.is_resolved() {
        return json!({ "request": record.request(), "outcome": outcome });
    }

    let rule = record
        .matched_rule()
        .ok()
        .flatten()
        .map(|rule| json!({ "pattern": rule.pattern, "template": rule.template }));
    json!({
        "request": record.request(),
        "matched_rule": rule,
        "matched_query": record.matched_query().ok(),
        "permalink_vars": record.permalink_vars().ok().flatten(),
        "outcome": outcome,
    })
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_vars_follow_query_string_rules() {
        let map = parse_vars(&args(&["tag[]=a", "tag[]=b", "my.key=1", "s=one", "s=two"])).unwrap();

        assert_eq!(map.get("tag"), Some(&QueryValue::from(vec!["a", "b"])));
        assert_eq!(map.get("my_key"), Some(&QueryValue::from("1")));
        assert_eq!(map.get("s"), Some(&QueryValue::from("two")));
    }

    #[test]
    fn test_var_values_are_literal() {
        let map = parse_vars(&args(&["s=a+b%21", "q=x=y&z"])).unwrap();
        assert_eq!(map.get("s"), Some(&QueryValue::from("a+b%21")));
        assert_eq!(map.get("q"), Some(&QueryValue::from("x=y&z")));
    }

    #[test]
    fn test_var_without_equals_is_rejected() {
        assert!(parse_vars(&args(&["paged"])).is_err());
    }

    #[test]
    fn test_vars_override_json_vars() {
        let map = extra_vars(Some(r#"{"paged": 2, "s": "x"}"#), &args(&["paged=3"])).unwrap();
        assert_eq!(map.get("paged"), Some(&QueryValue::from("3")));
        assert_eq!(map.get("s"), Some(&QueryValue::from("x")));
    }

    #[test]
    fn test_vars_json_must_be_object() {
        assert!(extra_vars(Some("[1, 2]"), &[]).is_err());
        assert!(extra_vars(Some("{not json"), &[]).is_err());
    }
}
