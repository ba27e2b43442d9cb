use std::env;

use paycheck::core::PlanConfiguration;

#[tokio::main]
async fn main() {
    env_logger::init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let plan = match raw_args.get(3) {
            Some(path) => match PlanConfiguration::from_path(path) {
                Ok(plan) => plan,
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    std::process::exit(1);
                }
            },
            None => PlanConfiguration::reference(),
        };
        if let Err(e) = paycheck::api::run_http_server(port, plan).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    match paycheck::api::run_cli(raw_args) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
