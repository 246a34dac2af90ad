use std::process::ExitCode;

pub fn run(config_path: Option<&str>) -> ExitCode {
    let json = super::load_config(config_path).and_then(|c| {
        c.validate()?;
        c.to_json()
    });
    match json {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => ExitCode::from(super::config_error(&e)),
    }
}
