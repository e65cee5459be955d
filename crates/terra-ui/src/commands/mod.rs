pub mod link;
pub mod navigate;
pub mod resolve;
pub mod routes;

use anyhow::{anyhow, bail, Result};
use terra_router::RouteParams;
use terra_ui::AppRoute;

/// Parses a route key name as listed by `terra-ui routes`
pub fn parse_route(name: &str) -> Result<AppRoute> {
    AppRoute::from_name(name).ok_or_else(|| {
        let known: Vec<String> = AppRoute::ALL.iter().map(|r| r.to_string()).collect();
        anyhow!("Unknown route '{}'. Known routes: {}", name, known.join(", "))
    })
}

/// Parses `name=value` arguments into route params
pub fn parse_params(args: &[String]) -> Result<RouteParams> {
    args.iter().try_fold(RouteParams::new(), |params, arg| {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("Expected name=value, got '{}'", arg);
        };
        if name.is_empty() {
            bail!("Parameter name missing in '{}'", arg);
        }
        Ok(params.with(name, value))
    })
}
