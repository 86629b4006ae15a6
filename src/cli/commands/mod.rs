use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings");
        println!("Set JWT_SECRET before exposing the server");
    } else {
        println!("config.toml already exists, leaving it untouched");
    }
    Ok(())
}

pub fn cmd_show_config(config: &Config) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
