//! Account commands: register, login, logout, whoami.

use cartwheel_core::Email;

use super::{CliError, Context};

/// Create an account and sign in.
pub async fn register(name: &str, email: &str, password: &str) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let email = Email::parse(email)?;

    let user = ctx.session.register(name, &email, password).await?;
    println!("Account created: {} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

/// Sign in.
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let email = Email::parse(email)?;

    let user = ctx.session.login(&email, password).await?;
    if user.is_admin() {
        println!("Admin logged in: {} <{}>", user.name, user.email);
    } else {
        println!("Logged in: {} <{}>", user.name, user.email);
    }
    Ok(())
}

/// Sign out. Idempotent.
#[allow(clippy::unused_async)]
pub async fn logout() -> Result<(), CliError> {
    let ctx = Context::load()?;
    ctx.session.logout();
    println!("Logged out");
    Ok(())
}

/// Show the signed-in user (from the session file, no network call).
#[allow(clippy::unused_async)]
pub async fn whoami() -> Result<(), CliError> {
    let ctx = Context::load()?;
    match ctx.session.current_user() {
        Some(user) => {
            println!(
                "{} <{}> (id {}, role {:?}, {} cart lines, {} wishlisted, {} orders)",
                user.name,
                user.email,
                user.id,
                user.role,
                user.cart.len(),
                user.wishlist.len(),
                user.orders.len()
            );
        }
        None => println!("Not signed in"),
    }
    Ok(())
}
