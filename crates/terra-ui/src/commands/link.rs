use anyhow::Result;
use terra_ui::App;

pub fn execute(app: &App, route: &str, params: &[String]) -> Result<()> {
    let route = super::parse_route(route)?;
    let params = super::parse_params(params)?;
    println!("{}", app.link(route, &params)?);
    Ok(())
}
