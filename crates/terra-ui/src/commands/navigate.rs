use anyhow::Result;
use colored::Colorize;
use terra_ui::App;

pub fn execute(app: &App, route: &str, params: &[String]) -> Result<()> {
    let route = super::parse_route(route)?;
    let params = super::parse_params(params)?;

    app.navigate(route, &params)?;

    println!("{} {}", "→".green(), app.history.href());
    println!("  page: {}", app.current_page().to_string().green());
    match app.state.selected_workspace.get() {
        Some(ws) => println!("  workspace: {}", ws.to_string().cyan()),
        None => println!("  workspace: {}", "none".dimmed()),
    }
    let recent = app.state.recent_workspaces.get();
    if !recent.is_empty() {
        let names: Vec<String> = recent.iter().map(|w| w.to_string()).collect();
        println!("  recent: {}", names.join(", "));
    }
    Ok(())
}
