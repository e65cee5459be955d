use colored::Colorize;
use terra_router::RouteKey;
use terra_ui::App;

pub fn execute(app: &App) {
    println!("{}", "Routes".bold());
    for handler in app.router.handlers() {
        let visibility = if handler.public { "public" } else { "" };
        println!(
            "  {:<24} {:<72} {} {}",
            handler.key.as_str().cyan(),
            handler.pattern.as_str(),
            handler.component.to_string().green(),
            visibility.dimmed()
        );
    }
}
