use colored::Colorize;
use terra_router::{Location, RouteKey};
use terra_ui::App;

pub fn execute(app: &App, target: &str) {
    let location = if target.starts_with('#') {
        Location::from_hash(target)
    } else {
        Location::parse(target)
    };

    match app.router.resolve(&location) {
        Some(route) => {
            println!(
                "{} {} -> {}",
                "✓".green(),
                route.key().as_str().cyan(),
                route.component().to_string().green()
            );
            for (name, value) in route.props.iter() {
                println!("  {} = {}", name, value);
            }
            for (name, value) in &route.query {
                println!("  ?{} = {}", name, value);
            }
        }
        None => println!("{} {} -> {}", "✗".red(), location, "NotFound".yellow()),
    }
}
