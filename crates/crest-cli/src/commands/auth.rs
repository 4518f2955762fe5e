use anyhow::{Result, bail};
use colored::Colorize;

use crest_core::ChatBackend;

use super::{build_controller, env_token, prompt_password};

pub async fn login(email: &str, password: Option<String>) -> Result<()> {
    let mut controller = build_controller()?;
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    controller.backend().login(email, &password).await?;
    // The profile fetch is the source of truth for the signed-in identity.
    controller.bootstrap(None).await;

    match &controller.state().user {
        Some(user) => println!("{} {}", "signed in as".green(), user.label()),
        None => bail!("login succeeded but the profile could not be fetched"),
    }
    Ok(())
}

pub async fn register(email: &str, password: Option<String>) -> Result<()> {
    let mut controller = build_controller()?;
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    controller.backend().register(email, &password).await?;
    println!("account created for {email}");

    // Sign in right away, as the web client does after registration.
    controller.backend().login(email, &password).await?;
    controller.bootstrap(None).await;
    if let Some(user) = &controller.state().user {
        println!("{} {}", "signed in as".green(), user.label());
    }
    Ok(())
}

pub async fn whoami() -> Result<()> {
    let mut controller = build_controller()?;
    if let Some(user) = controller.cached_user() {
        println!("{} {}", "cached:".dimmed(), user.label());
    }

    controller.bootstrap(env_token()).await;
    match &controller.state().user {
        Some(user) => println!("{} {}", "signed in as".green(), user.label()),
        None => println!("{}", "not signed in".yellow()),
    }
    Ok(())
}
